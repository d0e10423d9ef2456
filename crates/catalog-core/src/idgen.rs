//! SHA256 + base36 document id generation.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Base36 alphabet (0-9, a-z).
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated document ids.
pub const ID_LENGTH: usize = 20;

/// Converts a byte slice to a base36 string of exactly `length` characters.
///
/// Shorter encodings are left-padded with `0`; longer ones keep the least
/// significant digits.
pub fn encode_base36(data: &[u8], length: usize) -> String {
    let mut num = BigUint::from_bytes_be(data);
    let base = BigUint::from(36u32);
    let zero = BigUint::zero();

    let mut digits: Vec<char> = Vec::with_capacity(length);
    while num > zero {
        let rem = &num % &base;
        num /= &base;
        let i = rem.to_u32_digits().first().copied().unwrap_or(0) as usize;
        digits.push(char::from(BASE36_ALPHABET[i]));
    }
    digits.reverse();

    let mut s: String = digits.into_iter().collect();
    if s.len() < length {
        s = "0".repeat(length - s.len()) + &s;
    }
    if s.len() > length {
        s = s[s.len() - length..].to_owned();
    }
    s
}

/// Creates an opaque document id for a record in `collection`.
///
/// The id hashes the collection path, a caller-supplied seed (usually the
/// record's display name), the creation time and a nonce. Callers retry with
/// a higher nonce on collision.
pub fn generate_id(collection: &str, seed: &str, timestamp: DateTime<Utc>, nonce: u32) -> String {
    let content = format!(
        "{}|{}|{}|{}",
        collection,
        seed,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    let hash = Sha256::digest(content.as_bytes());
    // 13 bytes = 104 bits, just over the ~103.4 bits of 20 base36 digits.
    encode_base36(&hash[..13], ID_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn encode_base36_pads_zeros() {
        assert_eq!(encode_base36(&[], 4), "0000");
        assert_eq!(encode_base36(&[35], 2), "0z");
    }

    #[test]
    fn encode_base36_truncates() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(encode_base36(&data, 3).len(), 3);
    }

    #[test]
    fn id_has_fixed_length_and_alphabet() {
        let id = generate_id("products", "Homeowners", ts(), 0);
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| BASE36_ALPHABET.contains(&b)));
    }

    #[test]
    fn id_is_deterministic() {
        assert_eq!(
            generate_id("forms", "CP 00 10", ts(), 0),
            generate_id("forms", "CP 00 10", ts(), 0)
        );
    }

    #[test]
    fn nonce_and_collection_change_output() {
        let base = generate_id("forms", "CP 00 10", ts(), 0);
        assert_ne!(base, generate_id("forms", "CP 00 10", ts(), 1));
        assert_ne!(base, generate_id("rules", "CP 00 10", ts(), 0));
    }
}

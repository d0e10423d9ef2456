//! String-backed enum types for catalog records.
//!
//! Each enum serializes as the exact label stored in documents and
//! deserializes leniently: unknown labels are kept in a catch-all variant so
//! records written by other tools still load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + a catch-all fallback.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, custom_variant = $custom_variant:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            $custom_variant(String),
        }

        impl $name {
            /// Every known label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$( $str, )+];

            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::$custom_variant(s) => s.as_str(),
                }
            }

            /// Returns `true` if this is the default variant.
            pub fn is_default(&self) -> bool {
                *self == Self::$default
            }

            /// Returns `true` if this is a known (non-custom) variant.
            pub fn is_builtin(&self) -> bool {
                !matches!(self, Self::$custom_variant(_))
            }

            /// Parses a label, rejecting anything outside the known set.
            pub fn parse_known(s: &str) -> Option<Self> {
                match s {
                    $( $str => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::$custom_variant(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $str => Self::$variant, )+
                    _ => Self::$custom_variant(s),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Enum definitions
// ---------------------------------------------------------------------------

define_enum!(
    /// Discriminates the two kinds of pricing step.
    StepType, default = Factor, custom_variant = Unknown,
    variants: [
        (Factor, "factor"),
        (Operand, "operand"),
    ]
);

define_enum!(
    /// Arithmetic operator carried by an operand step.
    ///
    /// Factor steps store an empty operand, which maps to [`Operand::None`].
    Operand, default = None, custom_variant = Other,
    variants: [
        (None, ""),
        (Add, "+"),
        (Subtract, "-"),
        (Multiply, "*"),
        (Divide, "/"),
        (Equals, "="),
    ]
);

define_enum!(
    /// Where a factor's value comes from.
    FactorType, default = UserInput, custom_variant = Custom,
    variants: [
        (UserInput, "User Input"),
        (Table, "Table"),
        (Other, "Other"),
    ]
);

define_enum!(
    /// Rounding applied to a factor's value.
    Rounding, default = None, custom_variant = Custom,
    variants: [
        (None, "none"),
        (WholeNumber, "Whole Number"),
        (OneDecimal, "1 Decimal"),
        (TwoDecimals, "2 Decimals"),
        (Other, "Other"),
    ]
);

define_enum!(
    /// Axis of a rating table dimension.
    DimensionType, default = Row, custom_variant = Custom,
    variants: [
        (Row, "Row"),
        (Column, "Column"),
    ]
);

define_enum!(
    /// Provenance of a form document.
    FormType, default = Proprietary, custom_variant = Custom,
    variants: [
        (Proprietary, "Proprietary"),
        (Iso, "ISO"),
        (Naics, "NAICS"),
        (Other, "Other"),
    ]
);

define_enum!(
    /// Role a form plays in a policy.
    FormCategory, default = BaseCoverageForm, custom_variant = Custom,
    variants: [
        (BaseCoverageForm, "Base Coverage Form"),
        (Endorsement, "Endorsement"),
        (Exclusion, "Exclusion"),
        (DecQuoteLetter, "Dec/Quote Letter"),
        (Notice, "Notice"),
        (Other, "Other"),
    ]
);

impl Operand {
    /// Returns `true` for the five operators a pricing chain understands.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Equals
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_stored_label() {
        let json = serde_json::to_string(&Rounding::WholeNumber).unwrap();
        assert_eq!(json, "\"Whole Number\"");
        let json = serde_json::to_string(&FormCategory::DecQuoteLetter).unwrap();
        assert_eq!(json, "\"Dec/Quote Letter\"");
    }

    #[test]
    fn unknown_label_is_preserved() {
        let t: FactorType = serde_json::from_str("\"Lookup\"").unwrap();
        assert_eq!(t, FactorType::Custom("Lookup".into()));
        assert_eq!(t.as_str(), "Lookup");
        assert!(!t.is_builtin());
    }

    #[test]
    fn operand_labels() {
        assert_eq!(Operand::from("*"), Operand::Multiply);
        assert_eq!(Operand::from(""), Operand::None);
        assert!(Operand::Equals.is_arithmetic());
        assert!(!Operand::None.is_arithmetic());
        assert!(!Operand::from("%").is_arithmetic());
    }

    #[test]
    fn parse_known_rejects_custom() {
        assert_eq!(DimensionType::parse_known("Column"), Some(DimensionType::Column));
        assert_eq!(DimensionType::parse_known("column"), None);
    }

    #[test]
    fn defaults() {
        assert!(StepType::Factor.is_default());
        assert_eq!(FormType::default(), FormType::Proprietary);
        assert_eq!(FormCategory::default().as_str(), "Base Coverage Form");
    }
}

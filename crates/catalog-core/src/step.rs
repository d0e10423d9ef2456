//! Pricing step records.
//!
//! A product's pricing is an ordered chain of steps. Factor steps carry a
//! value (and the metadata describing where it comes from); operand steps
//! carry the operator applied between the running total and the next factor.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::enums::{FactorType, Operand, Rounding, StepType};

/// Coverage a new factor is attached to when none is given.
pub const DEFAULT_COVERAGE: &str = "Base Coverage";

/// One node of a pricing chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Position in the chain; lower runs first.
    #[serde(default)]
    pub order: i64,

    #[serde(default)]
    pub step_type: StepType,

    // -- Factor fields -------------------------------------------------------
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub step_name: String,

    /// Name of the coverage this factor prices.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub coverage: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub paren_before: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub paren_after: String,

    #[serde(default, rename = "type", skip_serializing_if = "FactorType::is_default")]
    pub factor_type: FactorType,

    /// Name of the rating table when `factor_type` is `Table`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub table: String,

    #[serde(default, skip_serializing_if = "Rounding::is_default")]
    pub rounding: Rounding,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rules: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub upstream_id: String,

    /// Numeric value; absent means zero. Written as a decimal string.
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Decimal>,

    // -- Operand fields ------------------------------------------------------
    #[serde(default, skip_serializing_if = "Operand::is_default")]
    pub operand: Operand,
}

impl Step {
    pub fn is_factor(&self) -> bool {
        self.step_type == StepType::Factor
    }

    pub fn is_operand(&self) -> bool {
        self.step_type == StepType::Operand
    }

    /// The factor's value, zero when unset.
    pub fn value_or_zero(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }

    /// Label shown in chain listings: the step name for factors, the
    /// operator for operands.
    pub fn label(&self) -> &str {
        if self.is_operand() {
            self.operand.as_str()
        } else {
            &self.step_name
        }
    }
}

impl Document for Step {
    const KIND: &'static str = "step";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn display_name(&self) -> &str {
        self.label()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Step`] records.
#[derive(Debug, Clone)]
pub struct StepBuilder {
    step: Step,
}

impl StepBuilder {
    /// Starts a factor step.
    pub fn factor(step_name: impl Into<String>) -> Self {
        Self {
            step: Step {
                step_type: StepType::Factor,
                step_name: step_name.into(),
                coverage: DEFAULT_COVERAGE.to_owned(),
                ..Step::default()
            },
        }
    }

    /// Starts an operand step.
    pub fn operand(operand: Operand) -> Self {
        Self {
            step: Step {
                step_type: StepType::Operand,
                operand,
                ..Step::default()
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.step.id = id.into();
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.step.order = order;
        self
    }

    pub fn coverage(mut self, coverage: impl Into<String>) -> Self {
        self.step.coverage = coverage.into();
        self
    }

    pub fn value(mut self, value: Decimal) -> Self {
        self.step.value = Some(value);
        self
    }

    pub fn factor_type(mut self, factor_type: FactorType) -> Self {
        self.step.factor_type = factor_type;
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.step.table = table.into();
        self
    }

    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.step.rounding = rounding;
        self
    }

    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.step.rules = rules.into();
        self
    }

    pub fn parens(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.step.paren_before = before.into();
        self.step.paren_after = after.into();
        self
    }

    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn upstream_id(mut self, upstream_id: impl Into<String>) -> Self {
        self.step.upstream_id = upstream_id.into();
        self
    }

    pub fn build(self) -> Step {
        self.step
    }
}

/// Accepts a JSON number or a numeric string. Null, blank and non-numeric
/// strings read as absent.
fn lenient_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Decimal>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn operand_step_serializes_compactly() {
        let step = StepBuilder::operand(Operand::Multiply).order(1).build();
        let v = serde_json::to_value(&step).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"order": 1, "stepType": "operand", "operand": "*"})
        );
    }

    #[test]
    fn factor_value_accepts_json_numbers() {
        let step: Step = serde_json::from_str(
            r#"{"stepType":"factor","stepName":"Base Rate","coverage":"Building","value":125.5,"order":0}"#,
        )
        .unwrap();
        assert_eq!(step.value_or_zero(), Decimal::new(1255, 1));
        assert!(step.is_factor());
    }

    #[test]
    fn factor_value_reads_strings_and_blanks() {
        let parse = |value: &str| -> Step {
            serde_json::from_str(&format!(
                r#"{{"stepType":"factor","stepName":"Base Rate","coverage":"Building","value":{value}}}"#
            ))
            .unwrap()
        };
        assert_eq!(parse(r#""42.50""#).value, Some(Decimal::new(4250, 2)));
        assert_eq!(parse(r#""""#).value, None);
        assert_eq!(parse(r#""  ""#).value_or_zero(), Decimal::ZERO);
        assert_eq!(parse("null").value, None);
        assert_eq!(parse(r#""n/a""#).value, None);
    }

    #[test]
    fn factor_value_is_written_as_string() {
        let step = StepBuilder::factor("Base Rate").value(Decimal::new(1255, 1)).build();
        let v = serde_json::to_value(&step).unwrap();
        assert_eq!(v["value"], "125.5");
    }

    #[test]
    fn missing_value_is_zero() {
        let step = StepBuilder::factor("Territory").build();
        assert_eq!(step.value_or_zero(), Decimal::ZERO);
        assert_eq!(step.coverage, DEFAULT_COVERAGE);
    }

    #[test]
    fn label_depends_on_type() {
        assert_eq!(StepBuilder::factor("Base Rate").build().label(), "Base Rate");
        assert_eq!(StepBuilder::operand(Operand::Divide).build().label(), "/");
    }

    #[test]
    fn table_factor_keeps_type() {
        let step = StepBuilder::factor("Construction")
            .factor_type(FactorType::Table)
            .table("construction-class")
            .rounding(Rounding::TwoDecimals)
            .build();
        let v = serde_json::to_value(&step).unwrap();
        assert_eq!(v["type"], "Table");
        assert_eq!(v["rounding"], "2 Decimals");
    }
}

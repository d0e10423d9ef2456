//! Required-field and consistency checks run before every write.

use crate::coverage::Coverage;
use crate::dimension::{Dimension, MAX_DIMENSIONS};
use crate::enums::StepType;
use crate::form::Form;
use crate::product::Product;
use crate::rule::Rule;
use crate::states::{UnknownState, parse_state};
use crate::step::Step;

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{entity} {field} is required")]
    Required {
        entity: &'static str,
        field: &'static str,
    },

    #[error("invalid operand {0:?}: expected one of + - * / =")]
    InvalidOperand(String),

    #[error("invalid step type: {0}")]
    InvalidStepType(String),

    #[error("invalid dimension type {0:?}: expected Row or Column")]
    InvalidDimensionType(String),

    #[error("a table can have at most {MAX_DIMENSIONS} dimensions")]
    TooManyDimensions,

    #[error("table already has a {0} dimension")]
    DuplicateDimension(String),

    #[error(transparent)]
    UnknownState(#[from] UnknownState),
}

fn require(
    value: &str,
    entity: &'static str,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { entity, field });
    }
    Ok(())
}

fn check_states(states: &[String]) -> Result<(), ValidationError> {
    for code in states {
        parse_state(code)?;
    }
    Ok(())
}

pub fn validate_product(product: &Product) -> Result<(), ValidationError> {
    require(&product.name, "product", "name")?;
    require(&product.form_number, "product", "form number")?;
    check_states(&product.available_states)
}

pub fn validate_coverage(coverage: &Coverage) -> Result<(), ValidationError> {
    require(&coverage.name, "coverage", "name")?;
    require(&coverage.form_number, "coverage", "form number")
}

pub fn validate_form(form: &Form) -> Result<(), ValidationError> {
    require(&form.form_name, "form", "name")?;
    require(&form.form_number, "form", "number")?;
    require(&form.effective_date, "form", "effective date")
}

/// Factors need a name and a coverage; operands need one of the five
/// operators.
pub fn validate_step(step: &Step) -> Result<(), ValidationError> {
    match &step.step_type {
        StepType::Factor => {
            require(&step.step_name, "step", "name")?;
            require(&step.coverage, "step", "coverage")?;
            check_states(&step.states)
        }
        StepType::Operand => {
            if step.operand.is_arithmetic() {
                Ok(())
            } else {
                Err(ValidationError::InvalidOperand(step.operand.as_str().to_owned()))
            }
        }
        StepType::Unknown(other) => Err(ValidationError::InvalidStepType(other.clone())),
    }
}

pub fn validate_dimension(dimension: &Dimension) -> Result<(), ValidationError> {
    require(&dimension.name, "dimension", "name")?;
    require(&dimension.values, "dimension", "values")?;
    require(&dimension.technical_code, "dimension", "technical code")?;
    if !dimension.dim_type.is_builtin() {
        return Err(ValidationError::InvalidDimensionType(
            dimension.dim_type.as_str().to_owned(),
        ));
    }
    Ok(())
}

/// Checks that `candidate` can join `existing` on the same step.
///
/// A dimension in `existing` with the candidate's id is skipped, so the
/// same check covers edits.
pub fn validate_dimension_slot(
    existing: &[Dimension],
    candidate: &Dimension,
) -> Result<(), ValidationError> {
    let others: Vec<&Dimension> = existing
        .iter()
        .filter(|d| candidate.id.is_empty() || d.id != candidate.id)
        .collect();
    if others.len() >= MAX_DIMENSIONS {
        return Err(ValidationError::TooManyDimensions);
    }
    if others.iter().any(|d| d.dim_type == candidate.dim_type) {
        return Err(ValidationError::DuplicateDimension(
            candidate.dim_type.as_str().to_owned(),
        ));
    }
    Ok(())
}

pub fn validate_rule(rule: &Rule) -> Result<(), ValidationError> {
    require(&rule.name, "rule", "name")?;
    require(&rule.condition, "rule", "condition")?;
    require(&rule.outcome, "rule", "outcome")
}

// ---------------------------------------------------------------------------
// Validate trait
// ---------------------------------------------------------------------------

/// Records that carry their own pre-write checks.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Product {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_product(self)
    }
}

impl Validate for Coverage {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_coverage(self)
    }
}

impl Validate for Form {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_form(self)
    }
}

impl Validate for Step {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_step(self)
    }
}

impl Validate for Dimension {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_dimension(self)
    }
}

impl Validate for Rule {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_rule(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DimensionType, Operand};
    use crate::step::StepBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn product_requires_name_and_form_number() {
        let err = validate_product(&Product::new("", "HO-3")).unwrap_err();
        assert_eq!(err.to_string(), "product name is required");
        let err = validate_product(&Product::new("Homeowners", "  ")).unwrap_err();
        assert_eq!(err.to_string(), "product form number is required");
        assert!(validate_product(&Product::new("Homeowners", "HO-3")).is_ok());
    }

    #[test]
    fn product_states_must_be_known() {
        let mut p = Product::new("Homeowners", "HO-3");
        p.available_states = vec!["CA".into(), "ZZ".into()];
        assert!(matches!(
            validate_product(&p),
            Err(ValidationError::UnknownState(_))
        ));
    }

    #[test]
    fn form_requires_effective_date() {
        let err = validate_form(&Form::new("Policy Jacket", "IL 00 01", "")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                entity: "form",
                field: "effective date"
            }
        );
    }

    #[test]
    fn factor_requires_coverage() {
        let step = StepBuilder::factor("Base Rate").coverage("").build();
        assert!(validate_step(&step).is_err());
        let step = StepBuilder::factor("Base Rate").build();
        assert!(validate_step(&step).is_ok());
    }

    #[test]
    fn operand_must_be_arithmetic() {
        assert!(validate_step(&StepBuilder::operand(Operand::None).build()).is_err());
        assert!(validate_step(&StepBuilder::operand(Operand::from("%")).build()).is_err());
        assert!(validate_step(&StepBuilder::operand(Operand::Equals).build()).is_ok());
    }

    #[test]
    fn third_dimension_rejected() {
        let existing = vec![
            Dimension::new("A", "1", "A", DimensionType::Row),
            Dimension::new("B", "1", "B", DimensionType::Column),
        ];
        let extra = Dimension::new("C", "1", "C", DimensionType::Row);
        assert_eq!(
            validate_dimension_slot(&existing, &extra),
            Err(ValidationError::TooManyDimensions)
        );
    }

    #[test]
    fn duplicate_axis_rejected() {
        let existing = vec![Dimension::new("A", "1", "A", DimensionType::Row)];
        let extra = Dimension::new("B", "2", "B", DimensionType::Row);
        assert_eq!(
            validate_dimension_slot(&existing, &extra),
            Err(ValidationError::DuplicateDimension("Row".into()))
        );
    }

    #[test]
    fn editing_a_dimension_does_not_count_itself() {
        let mut row = Dimension::new("A", "1", "A", DimensionType::Row);
        row.id = "d1".into();
        let mut col = Dimension::new("B", "1", "B", DimensionType::Column);
        col.id = "d2".into();
        let existing = vec![row.clone(), col];
        row.values = "1,2".into();
        assert!(validate_dimension_slot(&existing, &row).is_ok());
    }

    #[test]
    fn dimension_type_must_be_axis() {
        let d = Dimension::new("A", "1", "A", DimensionType::from("Diagonal"));
        assert!(validate_dimension(&d).is_err());
    }

    #[test]
    fn rule_requires_condition_and_outcome() {
        assert!(validate_rule(&Rule::new("Vacancy", "", "THEN x")).is_err());
        assert!(validate_rule(&Rule::new("Vacancy", "IF y", "")).is_err());
        assert!(validate_rule(&Rule::new("Vacancy", "IF y", "THEN x")).is_ok());
    }
}

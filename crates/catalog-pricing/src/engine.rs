//! Left-to-right evaluation of a pricing chain.
//!
//! The chain is folded in `order`. The first factor seeds the running total;
//! every later factor is combined with it through the most recent operand
//! seen since the previous factor. There is no precedence and no grouping.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use catalog_core::enums::{Operand, StepType};
use catalog_core::step::Step;

/// Result of evaluating a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTotal {
    /// The chain had no factor steps.
    NotAvailable,
    Amount(Decimal),
}

impl PriceTotal {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::NotAvailable => None,
            Self::Amount(d) => Some(*d),
        }
    }
}

impl fmt::Display for PriceTotal {
    /// `N/A`, or the amount rounded half away from zero to two places.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => f.write_str("N/A"),
            Self::Amount(d) => {
                let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                write!(f, "{rounded:.2}")
            }
        }
    }
}

/// One row of an evaluation trace: the step and the running total after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub step_id: String,
    pub order: i64,
    pub label: String,
    /// Running total after this step, `None` until the first factor.
    pub running: Option<Decimal>,
    /// Operand waiting for the next factor after this step.
    pub pending: Option<Operand>,
}

/// Fold state shared by [`evaluate`] and [`evaluate_with_trace`].
#[derive(Debug, Default)]
struct Accumulator {
    result: Option<Decimal>,
    pending: Option<Operand>,
}

impl Accumulator {
    fn push(&mut self, step: &Step) {
        match &step.step_type {
            StepType::Factor => {
                let value = step.value_or_zero();
                match self.result {
                    // A pending operand survives the seeding factor.
                    None => self.result = Some(value),
                    Some(total) => {
                        if let Some(op) = self.pending.take() {
                            self.result = Some(apply(total, &op, value));
                        }
                    }
                }
            }
            StepType::Operand => {
                if step.operand.is_arithmetic() {
                    self.pending = Some(step.operand.clone());
                }
            }
            StepType::Unknown(_) => {}
        }
    }
}

/// Applies `op` to the running total. Division by zero, `=` and any
/// overflowing operation leave the total unchanged.
fn apply(total: Decimal, op: &Operand, value: Decimal) -> Decimal {
    let next = match op {
        Operand::Add => total.checked_add(value),
        Operand::Subtract => total.checked_sub(value),
        Operand::Multiply => total.checked_mul(value),
        Operand::Divide if value.is_zero() => None,
        Operand::Divide => total.checked_div(value),
        _ => None,
    };
    next.unwrap_or(total)
}

/// Returns the steps sorted by `order`, keeping input order for ties.
fn in_order(steps: &[Step]) -> Vec<&Step> {
    let mut sorted: Vec<&Step> = steps.iter().collect();
    sorted.sort_by_key(|s| s.order);
    sorted
}

/// Evaluates a pricing chain.
pub fn evaluate(steps: &[Step]) -> PriceTotal {
    let mut acc = Accumulator::default();
    for step in in_order(steps) {
        acc.push(step);
    }
    match acc.result {
        Some(total) => PriceTotal::Amount(total),
        None => PriceTotal::NotAvailable,
    }
}

/// Evaluates a chain and records the running total after every step.
pub fn evaluate_with_trace(steps: &[Step]) -> (PriceTotal, Vec<TraceEntry>) {
    let mut acc = Accumulator::default();
    let mut trace = Vec::with_capacity(steps.len());
    for step in in_order(steps) {
        acc.push(step);
        trace.push(TraceEntry {
            step_id: step.id.clone(),
            order: step.order,
            label: step.label().to_owned(),
            running: acc.result,
            pending: acc.pending.clone(),
        });
    }
    let total = acc
        .result
        .map_or(PriceTotal::NotAvailable, PriceTotal::Amount);
    (total, trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::step::StepBuilder;
    use pretty_assertions::assert_eq;

    fn factor(order: i64, value: i64) -> Step {
        StepBuilder::factor(format!("f{order}"))
            .order(order)
            .value(Decimal::from(value))
            .build()
    }

    fn op(order: i64, symbol: &str) -> Step {
        StepBuilder::operand(Operand::from(symbol)).order(order).build()
    }

    fn run(steps: &[Step]) -> String {
        evaluate(steps).to_string()
    }

    #[test]
    fn empty_chain_is_not_available() {
        assert_eq!(run(&[]), "N/A");
    }

    #[test]
    fn operands_only_is_not_available() {
        assert_eq!(run(&[op(0, "+"), op(1, "*")]), "N/A");
    }

    #[test]
    fn single_factor() {
        assert_eq!(run(&[factor(0, 100)]), "100.00");
    }

    #[test]
    fn addition() {
        assert_eq!(run(&[factor(0, 100), op(1, "+"), factor(2, 50)]), "150.00");
    }

    #[test]
    fn subtraction_and_multiplication() {
        let steps = [factor(0, 100), op(1, "-"), factor(2, 40), op(3, "*"), factor(4, 3)];
        assert_eq!(run(&steps), "180.00");
    }

    #[test]
    fn division_by_zero_leaves_total() {
        assert_eq!(run(&[factor(0, 100), op(1, "/"), factor(2, 0)]), "100.00");
    }

    #[test]
    fn division_rounds_to_cents() {
        assert_eq!(run(&[factor(0, 10), op(1, "/"), factor(2, 3)]), "3.33");
        assert_eq!(run(&[factor(0, 20), op(1, "/"), factor(2, 3)]), "6.67");
    }

    #[test]
    fn last_consecutive_operand_wins() {
        assert_eq!(
            run(&[factor(0, 10), op(1, "+"), op(2, "*"), factor(3, 5)]),
            "50.00"
        );
    }

    #[test]
    fn factor_without_operand_is_ignored() {
        assert_eq!(run(&[factor(0, 10), factor(1, 99)]), "10.00");
    }

    #[test]
    fn operand_is_consumed_by_one_factor() {
        let steps = [factor(0, 10), op(1, "+"), factor(2, 5), factor(3, 100)];
        assert_eq!(run(&steps), "15.00");
    }

    #[test]
    fn equals_leaves_total() {
        assert_eq!(run(&[factor(0, 42), op(1, "="), factor(2, 7)]), "42.00");
    }

    #[test]
    fn missing_value_counts_as_zero() {
        let mut blank = factor(2, 0);
        blank.value = None;
        assert_eq!(run(&[factor(0, 8), op(1, "*"), blank]), "0.00");
    }

    #[test]
    fn leading_operand_is_kept_for_second_factor() {
        // The first factor seeds the total; the pending operand survives it.
        assert_eq!(run(&[op(0, "-"), factor(1, 10), factor(2, 4)]), "6.00");
    }

    #[test]
    fn evaluates_in_order_field() {
        let steps = [factor(2, 50), op(1, "+"), factor(0, 100)];
        assert_eq!(run(&steps), "150.00");
    }

    #[test]
    fn unknown_operand_is_skipped() {
        let steps = [factor(0, 10), op(1, "*"), op(2, "%"), factor(3, 3)];
        assert_eq!(run(&steps), "30.00");
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        let step = StepBuilder::factor("x").value(Decimal::new(2005, 3)).build();
        assert_eq!(run(&[step]), "2.01");
        let step = StepBuilder::factor("x").value(Decimal::new(-2005, 3)).build();
        assert_eq!(run(&[step]), "-2.01");
    }

    #[test]
    fn overflow_leaves_total() {
        let big = StepBuilder::factor("big").order(0).value(Decimal::MAX).build();
        let steps = [big, op(1, "*"), factor(2, 2)];
        assert_eq!(evaluate(&steps).amount(), Some(Decimal::MAX));
    }

    #[test]
    fn trace_records_running_totals() {
        let steps = [factor(0, 100), op(1, "+"), factor(2, 50)];
        let (total, trace) = evaluate_with_trace(&steps);
        assert_eq!(total, PriceTotal::Amount(Decimal::from(150)));
        let running: Vec<Option<Decimal>> = trace.iter().map(|t| t.running).collect();
        assert_eq!(
            running,
            vec![
                Some(Decimal::from(100)),
                Some(Decimal::from(100)),
                Some(Decimal::from(150))
            ]
        );
        assert_eq!(trace[1].pending, Some(Operand::Add));
        assert_eq!(trace[2].pending, None);
    }
}

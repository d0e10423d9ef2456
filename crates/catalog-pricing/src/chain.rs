//! Step chain maintenance: ordering, reordering and display filters.

use catalog_core::step::Step;

/// Errors raised when rearranging a chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("position {index} is out of range for a chain of {len} steps")]
    OutOfRange { index: usize, len: usize },

    #[error("step not found in chain: {0}")]
    UnknownStep(String),
}

/// Order assigned to a step appended to `steps`.
pub fn next_order(steps: &[Step]) -> i64 {
    steps.len() as i64
}

/// Sorts a chain by `order`, keeping storage order for ties.
pub fn sort_chain(steps: &mut [Step]) {
    steps.sort_by_key(|s| s.order);
}

/// Moves the step at `from` to position `to` and renumbers the whole chain
/// `0..n`. Returns the reordered chain.
pub fn reorder(steps: &[Step], from: usize, to: usize) -> Result<Vec<Step>, ChainError> {
    let len = steps.len();
    for index in [from, to] {
        if index >= len {
            return Err(ChainError::OutOfRange { index, len });
        }
    }
    let mut chain = steps.to_vec();
    sort_chain(&mut chain);
    let moved = chain.remove(from);
    chain.insert(to, moved);
    renumber(&mut chain);
    Ok(chain)
}

/// Moves the step with `step_id` to position `to`.
pub fn move_step(steps: &[Step], step_id: &str, to: usize) -> Result<Vec<Step>, ChainError> {
    let mut sorted = steps.to_vec();
    sort_chain(&mut sorted);
    let from = sorted
        .iter()
        .position(|s| s.id == step_id)
        .ok_or_else(|| ChainError::UnknownStep(step_id.to_owned()))?;
    reorder(&sorted, from, to)
}

/// Rewrites `order` to each step's index. Used after deletes so the chain
/// stays contiguous.
pub fn renumber(steps: &mut [Step]) {
    for (i, step) in steps.iter_mut().enumerate() {
        step.order = i as i64;
    }
}

/// Display filter over a chain. Filtering only dims steps in listings; the
/// evaluator always sees the full chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepFilter {
    /// Coverage names; empty means any.
    pub coverages: Vec<String>,
    /// State codes; empty means any.
    pub states: Vec<String>,
}

impl StepFilter {
    pub fn is_empty(&self) -> bool {
        self.coverages.is_empty() && self.states.is_empty()
    }

    /// Operands always match. A factor matches when its coverage is one of
    /// the selected coverages and it applies in at least one selected state.
    pub fn matches(&self, step: &Step) -> bool {
        if step.is_operand() {
            return true;
        }
        let coverage_ok = self.coverages.is_empty() || self.coverages.contains(&step.coverage);
        let states_ok = self.states.is_empty()
            || self
                .states
                .iter()
                .any(|s| step.states.iter().any(|t| t.eq_ignore_ascii_case(s)));
        coverage_ok && states_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::enums::Operand;
    use catalog_core::step::StepBuilder;
    use pretty_assertions::assert_eq;

    fn chain() -> Vec<Step> {
        vec![
            StepBuilder::factor("Base").id("a").order(0).build(),
            StepBuilder::operand(Operand::Multiply).id("b").order(1).build(),
            StepBuilder::factor("Territory").id("c").order(2).build(),
        ]
    }

    fn ids(steps: &[Step]) -> Vec<(&str, i64)> {
        steps.iter().map(|s| (s.id.as_str(), s.order)).collect()
    }

    #[test]
    fn next_order_is_length() {
        assert_eq!(next_order(&[]), 0);
        assert_eq!(next_order(&chain()), 3);
    }

    #[test]
    fn reorder_renumbers() {
        let moved = reorder(&chain(), 2, 0).unwrap();
        assert_eq!(ids(&moved), vec![("c", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        assert_eq!(
            reorder(&chain(), 0, 3),
            Err(ChainError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn move_step_by_id() {
        let mut steps = chain();
        steps.reverse();
        let moved = move_step(&steps, "a", 2).unwrap();
        assert_eq!(ids(&moved), vec![("b", 0), ("c", 1), ("a", 2)]);
        assert!(move_step(&steps, "zz", 0).is_err());
    }

    #[test]
    fn renumber_closes_gaps() {
        let mut steps = chain();
        steps.remove(1);
        renumber(&mut steps);
        assert_eq!(ids(&steps), vec![("a", 0), ("c", 1)]);
    }

    #[test]
    fn filter_matches_operands_always() {
        let filter = StepFilter {
            coverages: vec!["Liability".into()],
            states: vec![],
        };
        let steps = chain();
        assert!(!filter.matches(&steps[0]));
        assert!(filter.matches(&steps[1]));
    }

    #[test]
    fn filter_on_states_needs_intersection() {
        let step = StepBuilder::factor("Wind")
            .coverage("Building")
            .states(["FL", "TX"])
            .build();
        let filter = StepFilter {
            coverages: vec!["Building".into()],
            states: vec!["tx".into(), "CA".into()],
        };
        assert!(filter.matches(&step));
        let filter = StepFilter {
            coverages: vec![],
            states: vec!["CA".into()],
        };
        assert!(!filter.matches(&step));
        assert!(StepFilter::default().matches(&step));
    }
}

//! # Trigger Detection
//!
//! Watches completed evaluations for configured "magic" expressions.
//! A match on the launch pattern boots the virtual machine; a match on the
//! settings pattern opens the VM settings editor.

use serde::{Deserialize, Serialize};

use crate::core::engine::{Evaluation, Operator};

/// Relative tolerance used when comparing operands.
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerPattern {
    pub left: f64,
    pub right: f64,
    pub operator: Operator,
}

impl TriggerPattern {
    pub fn matches(&self, evaluation: &Evaluation) -> bool {
        self.operator == evaluation.operator
            && approx_eq(self.left, evaluation.left)
            && approx_eq(self.right, evaluation.right)
    }
}

/// What a matched trigger asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    LaunchVm,
    OpenSettings,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triggers {
    pub launch: Option<TriggerPattern>,
    pub settings: Option<TriggerPattern>,
}

impl Triggers {
    /// Resolve an evaluation to a trigger action. The launch pattern wins
    /// when both match.
    pub fn check(&self, evaluation: &Evaluation) -> Option<TriggerAction> {
        if self.launch.is_some_and(|p| p.matches(evaluation)) {
            return Some(TriggerAction::LaunchVm);
        }
        if self.settings.is_some_and(|p| p.matches(evaluation)) {
            return Some(TriggerAction::OpenSettings);
        }
        None
    }
}

/// Equality scaled by operand magnitude (absolute near zero).
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= RELATIVE_TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(left: f64, right: f64, operator: Operator) -> Evaluation {
        Evaluation {
            left,
            right,
            operator,
            result: operator.apply(left, right).unwrap_or(0.0),
        }
    }

    fn pattern(left: f64, right: f64, operator: Operator) -> TriggerPattern {
        TriggerPattern {
            left,
            right,
            operator,
        }
    }

    #[test]
    fn test_exact_match() {
        let p = pattern(1337.0, 42.0, Operator::Add);
        assert!(p.matches(&evaluation(1337.0, 42.0, Operator::Add)));
    }

    #[test]
    fn test_operator_mismatch() {
        let p = pattern(1337.0, 42.0, Operator::Add);
        assert!(!p.matches(&evaluation(1337.0, 42.0, Operator::Subtract)));
    }

    #[test]
    fn test_operands_not_swapped() {
        let p = pattern(1337.0, 42.0, Operator::Add);
        assert!(!p.matches(&evaluation(42.0, 1337.0, Operator::Add)));
    }

    #[test]
    fn test_tolerance_scales_with_magnitude() {
        assert!(approx_eq(1e12, 1e12 + 1e2));
        assert!(!approx_eq(1e12, 1e12 + 1e4));
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(approx_eq(0.0, 1e-10));
        assert!(!approx_eq(0.0, 1e-8));
    }

    #[test]
    fn test_launch_wins_over_settings() {
        let p = pattern(2.0, 2.0, Operator::Multiply);
        let triggers = Triggers {
            launch: Some(p),
            settings: Some(p),
        };
        assert_eq!(
            triggers.check(&evaluation(2.0, 2.0, Operator::Multiply)),
            Some(TriggerAction::LaunchVm)
        );
    }

    #[test]
    fn test_settings_trigger() {
        let triggers = Triggers {
            launch: Some(pattern(1337.0, 42.0, Operator::Add)),
            settings: Some(pattern(1337.0, 42.0, Operator::Subtract)),
        };
        assert_eq!(
            triggers.check(&evaluation(1337.0, 42.0, Operator::Subtract)),
            Some(TriggerAction::OpenSettings)
        );
        assert_eq!(triggers.check(&evaluation(1.0, 1.0, Operator::Add)), None);
    }

    #[test]
    fn test_no_triggers_configured() {
        let triggers = Triggers::default();
        assert_eq!(triggers.check(&evaluation(1337.0, 42.0, Operator::Add)), None);
    }
}

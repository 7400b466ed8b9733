use crate::planner::error::PlanError;

/// One successor of a `(state, action)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    pub next: S,
    pub probability: f64,
}

impl<S> Transition<S> {
    pub fn new(next: S, probability: f64) -> Self {
        Transition { next, probability }
    }

    /// Deterministic successor with probability 1.
    pub fn certain(next: S) -> Self {
        Transition {
            next,
            probability: 1.0,
        }
    }
}

/// Check that a successor distribution is a proper probability distribution.
///
/// `state` and `action` are only used to label the error.
pub(crate) fn check_distribution<S>(
    transitions: &[Transition<S>],
    tolerance: f64,
    state: impl FnOnce() -> String,
    action: impl FnOnce() -> String,
) -> Result<(), PlanError> {
    let mut sum = 0.0_f64;
    let mut invalid = None;
    for (i, transition) in transitions.iter().enumerate() {
        let p = transition.probability;
        if !p.is_finite() || p < 0.0 {
            invalid = Some((i, p));
            break;
        }
        sum += p;
    }

    if let Some((outcome_index, value)) = invalid {
        return Err(PlanError::InvalidProbability {
            state: state(),
            action: action(),
            outcome_index,
            value,
        });
    }

    if sum == 0.0 {
        return Err(PlanError::ZeroProbabilityMass {
            state: state(),
            action: action(),
        });
    }

    if (sum - 1.0).abs() > tolerance {
        return Err(PlanError::ProbabilitySum {
            state: state(),
            action: action(),
            sum,
            tolerance,
        });
    }

    Ok(())
}

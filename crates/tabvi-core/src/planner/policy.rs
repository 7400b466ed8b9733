use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::hashing::StateHasher;
use crate::planner::{
    error::PlanError,
    model::MdpModel,
    value_iteration::{QValue, ValueIteration},
};

/// How a greedy policy chooses among actions with the same maximal Q-value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First maximizing action in enumeration order.
    #[default]
    FirstMax,
    /// Uniformly random maximizing action.
    UniformRandom,
}

/// Probability assigned to one action by a policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionProb<A> {
    pub action: A,
    pub probability: f64,
}

/// Greedy policy over the one-step lookahead of a value-iteration planner.
///
/// The policy is total: states the planner never explored are evaluated against default values.
pub struct GreedyPolicy<'p, M, H>
where
    M: MdpModel,
    H: StateHasher<M::State>,
{
    planner: &'p ValueIteration<M, H>,
    tie_break: TieBreak,
    rng: ChaCha8Rng,
}

impl<'p, M, H> GreedyPolicy<'p, M, H>
where
    M: MdpModel,
    H: StateHasher<M::State>,
{
    /// Greedy policy that always takes the first maximizing action.
    pub fn deterministic(planner: &'p ValueIteration<M, H>) -> Self {
        Self::with_rng(planner, TieBreak::FirstMax, ChaCha8Rng::seed_from_u64(0))
    }

    /// Greedy policy that breaks ties uniformly with a deterministic RNG seed.
    pub fn uniform(planner: &'p ValueIteration<M, H>, seed: u64) -> Self {
        Self::with_rng(
            planner,
            TieBreak::UniformRandom,
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    pub fn with_rng(
        planner: &'p ValueIteration<M, H>,
        tie_break: TieBreak,
        rng: ChaCha8Rng,
    ) -> Self {
        GreedyPolicy {
            planner,
            tie_break,
            rng,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Whether repeated queries on the same state may return different actions.
    pub fn is_stochastic(&self) -> bool {
        self.tie_break == TieBreak::UniformRandom
    }

    /// Always true: unseen states fall back to default values.
    pub fn is_defined_for(&self, _state: &M::State) -> bool {
        true
    }

    /// Greedy action for `state`, or `None` when no action is applicable.
    pub fn action(&mut self, state: &M::State) -> Result<Option<M::Action>, PlanError> {
        let mut q_values = self.planner.q_values(state)?;
        let best = maximizers(&q_values);
        if best.is_empty() {
            return Ok(None);
        }

        let chosen = match self.tie_break {
            TieBreak::FirstMax => best[0],
            TieBreak::UniformRandom => best[self.rng.gen_range(0..best.len())],
        };
        Ok(Some(q_values.swap_remove(chosen).action))
    }

    /// Probability of every applicable action of `state` under this policy.
    pub fn action_distribution(
        &self,
        state: &M::State,
    ) -> Result<Vec<ActionProb<M::Action>>, PlanError> {
        let q_values = self.planner.q_values(state)?;
        let best = maximizers(&q_values);
        if best.is_empty() {
            return Err(PlanError::EmptyActionSet {
                state: format!("{:?}", self.planner.hasher().hash_state(state)),
            });
        }

        let mass = match self.tie_break {
            TieBreak::FirstMax => 1.0,
            TieBreak::UniformRandom => 1.0 / best.len() as f64,
        };

        Ok(q_values
            .into_iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = match self.tie_break {
                    TieBreak::FirstMax => i == best[0],
                    TieBreak::UniformRandom => best.contains(&i),
                };
                ActionProb {
                    action: q.action,
                    probability: if selected { mass } else { 0.0 },
                }
            })
            .collect())
    }
}

/// Indices of every action whose Q-value equals the maximum exactly, in enumeration order.
fn maximizers<A>(q_values: &[QValue<A>]) -> Vec<usize> {
    let mut best = Vec::new();
    let mut max_q = f64::NEG_INFINITY;

    for (i, q) in q_values.iter().enumerate() {
        if q.q > max_q {
            max_q = q.q;
            best.clear();
            best.push(i);
        } else if q.q == max_q {
            best.push(i);
        }
    }

    best
}

use std::slice;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::hashing::StateHasher;
use crate::planner::{
    affordance::{AffordanceSet, afforded_actions},
    backup::BellmanBackup,
    cache::TransitionCache,
    config::PlannerConfig,
    error::PlanError,
    ids::StateIndex,
    model::MdpModel,
    reachability::{ExploreReport, ReachabilityExplorer},
    transition::check_distribution,
    values::ValueTable,
};

/// Where the planner is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerStatus {
    /// No state has been explored yet; sweeps are rejected.
    Uninitialized,
    /// The reachable set changed since the last sweep loop.
    ReachabilityComputed,
    Converged,
    IterationLimitReached,
    /// A sweep hook asked the loop to stop early.
    Stopped,
}

/// Why a sweep loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepOutcome {
    Converged,
    IterationLimitReached,
    Stopped,
}

impl From<SweepOutcome> for PlannerStatus {
    fn from(outcome: SweepOutcome) -> Self {
        match outcome {
            SweepOutcome::Converged => PlannerStatus::Converged,
            SweepOutcome::IterationLimitReached => PlannerStatus::IterationLimitReached,
            SweepOutcome::Stopped => PlannerStatus::Stopped,
        }
    }
}

/// Returned by a sweep hook to continue or stop the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepControl {
    Continue,
    Stop,
}

/// Per-sweep metrics handed to sweep hooks.
#[derive(Debug, Clone, Copy)]
pub struct SweepMetrics {
    /// 1-based number of the sweep that just finished.
    pub iteration: usize,
    /// Largest absolute value change in this sweep.
    pub delta: f64,
    /// Number of states whose value was backed up.
    pub states_updated: usize,
}

/// Aggregate result of one sweep loop.
#[derive(Debug, Clone, Copy)]
pub struct SweepReport {
    pub iterations: usize,
    pub final_delta: f64,
    pub outcome: SweepOutcome,
}

/// Result of `plan_from_state`: what exploration found and how the sweeps ended.
#[derive(Debug, Clone, Copy)]
pub struct PlanReport {
    pub exploration: ExploreReport,
    pub sweeps: SweepReport,
}

/// One action and its one-step lookahead value.
#[derive(Debug, Clone, PartialEq)]
pub struct QValue<A> {
    pub action: A,
    pub q: f64,
}

/// Asynchronous value iteration over the states reachable from the planning start states.
///
/// The planner first discovers the reachable state graph and memoizes its transitions, then
/// sweeps over exactly those states. Values are updated in place, so later backups in a sweep
/// already see earlier updates of the same sweep.
pub struct ValueIteration<M, H>
where
    M: MdpModel,
    H: StateHasher<M::State>,
{
    mdp: M,
    hasher: H,
    config: PlannerConfig,
    affordances: Option<AffordanceSet<M::State, M::Action>>,
    cache: TransitionCache<H::Key, M::Action>,
    values: ValueTable<H::Key>,
    status: PlannerStatus,
}

impl<M, H> ValueIteration<M, H>
where
    M: MdpModel,
    H: StateHasher<M::State>,
{
    /// Create a planner after validating `config`.
    pub fn new(mdp: M, hasher: H, config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(ValueIteration {
            mdp,
            hasher,
            values: ValueTable::new(config.default_value),
            config,
            affordances: None,
            cache: TransitionCache::new(),
            status: PlannerStatus::Uninitialized,
        })
    }

    /// Prune the actions considered during exploration and lookahead.
    /// Install affordances before planning; already cached states keep their actions.
    pub fn with_affordances(mut self, affordances: AffordanceSet<M::State, M::Action>) -> Self {
        self.affordances = Some(affordances);
        self
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn affordances(&self) -> Option<&AffordanceSet<M::State, M::Action>> {
        self.affordances.as_ref()
    }

    pub fn cache(&self) -> &TransitionCache<H::Key, M::Action> {
        &self.cache
    }

    pub fn values(&self) -> &ValueTable<H::Key> {
        &self.values
    }

    pub fn status(&self) -> PlannerStatus {
        self.status
    }

    /// Drop all cached transitions and values.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.values.clear();
        self.status = PlannerStatus::Uninitialized;
    }

    /// Discover and cache every state reachable from `starts`.
    ///
    /// `report.performed()` is `false` when all start states were already cached.
    pub fn explore(&mut self, starts: &[M::State]) -> Result<ExploreReport, PlanError> {
        let explorer = ReachabilityExplorer::new(
            &self.mdp,
            &self.hasher,
            self.affordances.as_ref(),
            self.config.probability_tolerance,
        );
        let report = explorer.explore(&mut self.cache, &mut self.values, starts)?;
        if report.performed() {
            self.status = PlannerStatus::ReachabilityComputed;
        }
        Ok(report)
    }

    /// Explore from `state` if needed, then run value iteration.
    pub fn plan_from_state(&mut self, state: &M::State) -> Result<PlanReport, PlanError> {
        self.plan_from_states(slice::from_ref(state))
    }

    /// Explore from every state in `states` if needed, then run value iteration.
    pub fn plan_from_states(&mut self, states: &[M::State]) -> Result<PlanReport, PlanError> {
        let exploration = self.explore(states)?;
        let sweeps = self.run_sweeps()?;
        Ok(PlanReport {
            exploration,
            sweeps,
        })
    }

    /// Sweep the cached states until convergence or the iteration cap.
    pub fn run_sweeps(&mut self) -> Result<SweepReport, PlanError> {
        self.run_sweeps_with_hook(|_| SweepControl::Continue)
    }

    /// Sweep like `run_sweeps`, calling `on_sweep` after every sweep.
    /// Returning `SweepControl::Stop` ends the loop before the next sweep.
    pub fn run_sweeps_with_hook<F>(&mut self, mut on_sweep: F) -> Result<SweepReport, PlanError>
    where
        F: FnMut(&SweepMetrics) -> SweepControl,
    {
        if self.status == PlannerStatus::Uninitialized {
            return Err(PlanError::NotInitialized);
        }

        let backup = BellmanBackup::new(self.config.gamma);
        let mut iterations = 0;
        let mut final_delta = f64::INFINITY;
        let mut outcome = SweepOutcome::IterationLimitReached;

        while iterations < self.config.max_iterations {
            let (delta, states_updated) = self.sweep(&backup);
            iterations += 1;
            final_delta = delta;

            let metrics = SweepMetrics {
                iteration: iterations,
                delta,
                states_updated,
            };
            trace!("sweep {iterations}: delta={delta:.3e}, updated={states_updated}");
            let control = on_sweep(&metrics);

            if delta < self.config.max_delta {
                outcome = SweepOutcome::Converged;
                break;
            }
            if control == SweepControl::Stop {
                outcome = SweepOutcome::Stopped;
                break;
            }
        }

        if outcome == SweepOutcome::IterationLimitReached {
            warn!(
                "value iteration hit the iteration cap of {} with delta {final_delta:.3e}",
                self.config.max_iterations
            );
        }
        debug!("passes: {iterations}, outcome: {outcome:?}");

        self.status = outcome.into();
        Ok(SweepReport {
            iterations,
            final_delta,
            outcome,
        })
    }

    /// One Gauss-Seidel pass over every cached non-terminal state.
    fn sweep(&mut self, backup: &BellmanBackup) -> (f64, usize) {
        let mut delta = 0.0_f64;
        let mut updated = 0;

        for position in 0..self.cache.len() {
            let Some(entry) = self.cache.get(StateIndex::from(position)) else {
                continue;
            };
            let Some(q) = backup.max_q(entry, &self.cache, &self.values) else {
                continue;
            };

            let previous = self.values.update(entry.key(), q);
            delta = delta.max((q - previous).abs());
            updated += 1;
        }

        (delta, updated)
    }

    /// Current value estimate of `state`.
    /// Terminal states are worth 0; states never explored read as the default value.
    pub fn value(&self, state: &M::State) -> f64 {
        if self.mdp.is_terminal(state) {
            return 0.0;
        }
        self.values.value(&self.hasher.hash_state(state))
    }

    /// Applicable actions of `state` after affordance pruning.
    pub fn applicable_actions(&self, state: &M::State) -> Vec<M::Action> {
        afforded_actions(&self.mdp, self.affordances.as_ref(), state)
    }

    /// One-step lookahead Q-values of every applicable action of `state`, in enumeration order.
    ///
    /// Cached transitions are used when the state is cached with exactly these actions;
    /// otherwise the lookahead is computed from the model against the current value table.
    pub fn q_values(&self, state: &M::State) -> Result<Vec<QValue<M::Action>>, PlanError> {
        if self.mdp.is_terminal(state) {
            return Ok(Vec::new());
        }

        let actions = self.applicable_actions(state);
        let key = self.hasher.hash_state(state);
        let backup = BellmanBackup::new(self.config.gamma);

        if let Some(entry) = self.cache.entry(&key) {
            let matches_cache = !entry.is_terminal()
                && entry.is_expanded()
                && entry.actions().len() == actions.len()
                && entry
                    .actions()
                    .iter()
                    .zip(&actions)
                    .all(|(cached, action)| cached.action() == action);

            if matches_cache {
                return Ok(entry
                    .actions()
                    .iter()
                    .map(|cached| QValue {
                        action: cached.action().clone(),
                        q: backup.q_value(cached, &self.cache, &self.values),
                    })
                    .collect());
            }
        }

        actions
            .into_iter()
            .map(|action| {
                let q = self.lookahead(state, &key, &action, &backup)?;
                Ok(QValue { action, q })
            })
            .collect()
    }

    /// Q-value of one action in `state`, or `None` when the action is not applicable.
    pub fn q_value(&self, state: &M::State, action: &M::Action) -> Result<Option<f64>, PlanError> {
        Ok(self
            .q_values(state)?
            .into_iter()
            .find(|candidate| &candidate.action == action)
            .map(|candidate| candidate.q))
    }

    fn lookahead(
        &self,
        state: &M::State,
        key: &H::Key,
        action: &M::Action,
        backup: &BellmanBackup,
    ) -> Result<f64, PlanError> {
        let transitions = self.mdp.transitions(state, action);
        check_distribution(
            &transitions,
            self.config.probability_tolerance,
            || format!("{key:?}"),
            || format!("{action:?}"),
        )?;

        let mut q = 0.0;
        for transition in &transitions {
            let reward = self.mdp.reward(state, action, &transition.next);
            if !reward.is_finite() {
                return Err(PlanError::InvalidReward {
                    state: format!("{key:?}"),
                    action: format!("{action:?}"),
                    value: reward,
                });
            }
            q += transition.probability * (reward + backup.gamma() * self.value(&transition.next));
        }
        Ok(q)
    }
}

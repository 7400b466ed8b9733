use std::collections::VecDeque;

use log::debug;

use crate::hashing::StateHasher;
use crate::planner::{
    affordance::{AffordanceSet, afforded_actions},
    cache::{ActionTransitions, CachedTransition, TransitionCache},
    error::PlanError,
    ids::StateIndex,
    model::MdpModel,
    transition::check_distribution,
    values::ValueTable,
};

/// Counters describing one exploration call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExploreReport {
    /// Keys inserted into the cache by this call.
    pub new_states: usize,
    /// Non-terminal states whose actions were expanded.
    pub expanded: usize,
    /// Terminal states recorded.
    pub terminal_states: usize,
}

impl ExploreReport {
    /// Whether this call did any new work. `false` means every start state was already cached.
    pub fn performed(&self) -> bool {
        self.expanded + self.terminal_states > 0
    }
}

/// Breadth-first discovery of the states reachable from a set of start states.
pub struct ReachabilityExplorer<'a, M, H>
where
    M: MdpModel,
{
    mdp: &'a M,
    hasher: &'a H,
    affordances: Option<&'a AffordanceSet<M::State, M::Action>>,
    tolerance: f64,
}

impl<'a, M, H> ReachabilityExplorer<'a, M, H>
where
    M: MdpModel,
    H: StateHasher<M::State>,
{
    pub fn new(
        mdp: &'a M,
        hasher: &'a H,
        affordances: Option<&'a AffordanceSet<M::State, M::Action>>,
        tolerance: f64,
    ) -> Self {
        ReachabilityExplorer {
            mdp,
            hasher,
            affordances,
            tolerance,
        }
    }

    /// Expand every state reachable from `starts` into `cache`.
    ///
    /// Already expanded states are skipped, so repeated calls only pay for new territory.
    /// If the domain returns an invalid distribution, everything this call added is rolled back.
    pub fn explore(
        &self,
        cache: &mut TransitionCache<H::Key, M::Action>,
        values: &mut ValueTable<H::Key>,
        starts: &[M::State],
    ) -> Result<ExploreReport, PlanError> {
        let len_before = cache.len();
        match self.explore_from(cache, values, starts) {
            Ok(report) => Ok(report),
            Err(err) => {
                for position in len_before..cache.len() {
                    if let Some(key) = cache.key(StateIndex::from(position)) {
                        values.remove(key);
                    }
                }
                cache.truncate(len_before);
                Err(err)
            }
        }
    }

    fn explore_from(
        &self,
        cache: &mut TransitionCache<H::Key, M::Action>,
        values: &mut ValueTable<H::Key>,
        starts: &[M::State],
    ) -> Result<ExploreReport, PlanError> {
        let mut report = ExploreReport::default();
        let mut open: VecDeque<(StateIndex, M::State)> = VecDeque::new();

        let fresh_starts: Vec<(StateIndex, &M::State)> = starts
            .iter()
            .filter_map(|state| {
                let (index, inserted) = cache.intern(self.hasher.hash_state(state));
                if inserted {
                    report.new_states += 1;
                }
                let expanded = cache.get(index).is_some_and(|entry| entry.is_expanded());
                (!expanded).then_some((index, state))
            })
            .collect();

        if fresh_starts.is_empty() {
            return Ok(report);
        }

        debug!(
            "starting reachability analysis from {} start state(s)",
            fresh_starts.len()
        );

        for (index, state) in fresh_starts {
            self.visit(index, state, cache, values, &mut open, &mut report)?;
        }

        while let Some((index, state)) = open.pop_front() {
            self.visit(index, &state, cache, values, &mut open, &mut report)?;
        }

        debug!(
            "finished reachability analysis; {} new states, {} cached states",
            report.new_states,
            cache.len()
        );

        Ok(report)
    }

    fn visit(
        &self,
        index: StateIndex,
        state: &M::State,
        cache: &mut TransitionCache<H::Key, M::Action>,
        values: &mut ValueTable<H::Key>,
        open: &mut VecDeque<(StateIndex, M::State)>,
        report: &mut ExploreReport,
    ) -> Result<(), PlanError> {
        // Duplicate start states or successors may already have been handled.
        let Some(entry) = cache.get(index) else {
            return Ok(());
        };
        if entry.is_expanded() {
            return Ok(());
        }
        let key = entry.key().clone();

        if self.mdp.is_terminal(state) {
            cache.mark_terminal(index);
            values.set(key, 0.0);
            report.terminal_states += 1;
            return Ok(());
        }

        let actions = afforded_actions(self.mdp, self.affordances, state);
        let mut expansion = Vec::with_capacity(actions.len());

        for action in actions {
            let transitions = self.mdp.transitions(state, &action);
            check_distribution(
                &transitions,
                self.tolerance,
                || format!("{key:?}"),
                || format!("{action:?}"),
            )?;

            let mut cached = Vec::with_capacity(transitions.len());
            for transition in transitions {
                let reward = self.mdp.reward(state, &action, &transition.next);
                if !reward.is_finite() {
                    return Err(PlanError::InvalidReward {
                        state: format!("{key:?}"),
                        action: format!("{action:?}"),
                        value: reward,
                    });
                }

                let (next, inserted) = cache.intern(self.hasher.hash_state(&transition.next));
                if inserted {
                    report.new_states += 1;
                    open.push_back((next, transition.next));
                }

                cached.push(CachedTransition {
                    next,
                    probability: transition.probability,
                    reward,
                });
            }

            expansion.push(ActionTransitions::new(action, cached));
        }

        cache.expand(index, expansion);
        report.expanded += 1;
        Ok(())
    }
}

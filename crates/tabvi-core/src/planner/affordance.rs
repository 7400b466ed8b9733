use crate::planner::model::MdpModel;

/// A test on a state that decides whether an affordance applies.
pub trait Precondition<S> {
    fn holds(&self, state: &S) -> bool;
}

impl<S, F> Precondition<S> for F
where
    F: Fn(&S) -> bool,
{
    fn holds(&self, state: &S) -> bool {
        self(state)
    }
}

/// Maps one precondition to the actions worth considering when it holds.
pub struct Affordance<S, A> {
    precondition: Box<dyn Precondition<S>>,
    actions: Vec<A>,
}

impl<S, A> Affordance<S, A> {
    pub fn new(precondition: impl Precondition<S> + 'static, actions: Vec<A>) -> Self {
        Affordance {
            precondition: Box::new(precondition),
            actions,
        }
    }

    pub fn is_applicable(&self, state: &S) -> bool {
        self.precondition.holds(state)
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }
}

/// Knowledge base of affordances used to prune the action set during planning.
///
/// At a state, the permitted actions are the union of the lists of every affordance whose
/// precondition holds. When none holds, nothing is pruned.
pub struct AffordanceSet<S, A> {
    affordances: Vec<Affordance<S, A>>,
}

impl<S, A> Default for AffordanceSet<S, A> {
    fn default() -> Self {
        AffordanceSet {
            affordances: Vec::new(),
        }
    }
}

impl<S, A: PartialEq> AffordanceSet<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an affordance and return the set for chaining.
    pub fn with(mut self, precondition: impl Precondition<S> + 'static, actions: Vec<A>) -> Self {
        self.push(Affordance::new(precondition, actions));
        self
    }

    pub fn push(&mut self, affordance: Affordance<S, A>) {
        self.affordances.push(affordance);
    }

    pub fn len(&self) -> usize {
        self.affordances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.affordances.is_empty()
    }

    /// Restrict `actions` to those afforded in `state`, keeping enumeration order.
    pub fn filter(&self, state: &S, actions: Vec<A>) -> Vec<A> {
        let matching: Vec<&Affordance<S, A>> = self
            .affordances
            .iter()
            .filter(|affordance| affordance.is_applicable(state))
            .collect();

        if matching.is_empty() {
            return actions;
        }

        actions
            .into_iter()
            .filter(|action| {
                matching
                    .iter()
                    .any(|affordance| affordance.actions.contains(action))
            })
            .collect()
    }
}

/// Applicable actions of `state`, pruned by `affordances` when a set is installed.
pub(crate) fn afforded_actions<M: MdpModel>(
    mdp: &M,
    affordances: Option<&AffordanceSet<M::State, M::Action>>,
    state: &M::State,
) -> Vec<M::Action> {
    let actions = mdp.applicable_actions(state);
    match affordances {
        Some(set) => set.filter(state, actions),
        None => actions,
    }
}

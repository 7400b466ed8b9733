use crate::{
    ActionSpec, AffordanceSpec, CompiledMdp, MdpError, MdpSpec, OutcomeSpec, StatePredicate,
    StateSpec,
};

#[derive(Debug, Clone, Default)]
/// Incremental construction of an `MdpSpec` in code.
pub struct MdpBuilder {
    start: Option<String>,
    states: Vec<StateSpec>,
    affordances: Vec<AffordanceSpec>,
}

impl MdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start state id.
    pub fn set_start(&mut self, state: impl Into<String>) -> &mut Self {
        self.start = Some(state.into());
        self
    }

    /// Declare a state; terminal states must not get actions.
    pub fn add_state(&mut self, id: impl Into<String>, terminal: bool) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            terminal: Some(terminal),
            tags: None,
            actions: Some(Vec::new()),
        });
        self
    }

    /// Attach a tag to a declared state.
    pub fn add_tag(
        &mut self,
        state_id: impl AsRef<str>,
        tag: impl Into<String>,
    ) -> Result<&mut Self, MdpError> {
        let state = self.state_mut(state_id.as_ref())?;
        state.tags.get_or_insert_with(Vec::new).push(tag.into());
        Ok(self)
    }

    /// Declare an action of a state; outcomes are added with `add_outcome`.
    pub fn add_action(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl Into<String>,
    ) -> Result<&mut Self, MdpError> {
        let state = self.state_mut(state_id.as_ref())?;
        state.actions.get_or_insert_with(Vec::new).push(ActionSpec {
            id: action_id.into(),
            outcomes: Vec::new(),
        });
        Ok(self)
    }

    /// Add one `(next, prob, reward)` outcome to a declared action.
    pub fn add_outcome(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl AsRef<str>,
        next: impl Into<String>,
        prob: f64,
        reward: f64,
    ) -> Result<&mut Self, MdpError> {
        let state_id = state_id.as_ref();
        let action_id = action_id.as_ref();

        let action = self
            .state_mut(state_id)?
            .actions
            .get_or_insert_with(Vec::new)
            .iter_mut()
            .find(|a| a.id == action_id)
            .ok_or_else(|| MdpError::BuilderUnknownAction {
                state: state_id.to_string(),
                action: action_id.to_string(),
            })?;

        action.outcomes.push(OutcomeSpec {
            next: next.into(),
            prob,
            reward,
        });

        Ok(self)
    }

    /// Restrict planning to `actions` wherever `when` holds.
    pub fn add_affordance<I, T>(&mut self, when: StatePredicate, actions: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.affordances.push(AffordanceSpec {
            when,
            actions: actions.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Finish and validate the spec.
    pub fn build_spec(self) -> Result<MdpSpec, MdpError> {
        let start = self.start.ok_or(MdpError::MissingStart)?;
        let spec = MdpSpec {
            version: Some(1),
            start,
            states: self.states,
            affordances: (!self.affordances.is_empty()).then_some(self.affordances),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<CompiledMdp, MdpError> {
        self.build_spec()?.compile()
    }

    fn state_mut(&mut self, state_id: &str) -> Result<&mut StateSpec, MdpError> {
        self.states
            .iter_mut()
            .find(|s| s.id == state_id)
            .ok_or_else(|| MdpError::BuilderUnknownState {
                state: state_id.to_string(),
            })
    }
}

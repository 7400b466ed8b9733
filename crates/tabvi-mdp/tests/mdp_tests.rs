use approx::assert_relative_eq;
use tabvi_core::{
    GreedyPolicy, IdentityHasher, MdpModel, PlanError, PlannerConfig, SweepOutcome, ValueIteration,
};
use tabvi_mdp::{CompiledMdp, MdpBuilder, MdpError, MdpSpec, StatePredicate, load_yaml, save_yaml};

const CHAIN_YAML: &str = r#"
version: 1
start: s0
states:
  - id: s0
    actions:
      - id: go
        outcomes:
          - next: s1
            prob: 1.0
            reward: -1.0
  - id: s1
    actions:
      - id: go
        outcomes:
          - next: s2
            prob: 1.0
            reward: -1.0
  - id: s2
    terminal: true
"#;

const FORK_YAML: &str = r#"
start: s0
states:
  - id: s0
    tags: [fork]
    actions:
      - id: small
        outcomes:
          - next: s1
            prob: 1.0
            reward: 1.0
      - id: big
        outcomes:
          - next: s2
            prob: 0.5
            reward: 10.0
          - next: s0
            prob: 0.5
            reward: 0.0
  - id: s1
    terminal: true
  - id: s2
    terminal: true
affordances:
  - when:
      kind: has_tag
      tag: fork
    actions: [small]
"#;

fn compile(yaml: &str) -> Result<CompiledMdp, MdpError> {
    MdpSpec::from_yaml_str(yaml)?.compile()
}

fn planner(mdp: CompiledMdp, gamma: f64) -> ValueIteration<CompiledMdp, IdentityHasher> {
    ValueIteration::new(mdp, IdentityHasher, PlannerConfig::new(gamma, 1e-10, 1000))
        .expect("config should be valid")
}

#[test]
fn yaml_parse_and_compile_success() {
    let compiled = compile(CHAIN_YAML).expect("compile should succeed");
    let start = compiled.start();

    assert_eq!(compiled.state_count(), 3);
    assert_eq!(start.index(), 0);
    assert_eq!(compiled.state_id(start), Some("s0"));
    assert_eq!(compiled.action_ids(start), Some(vec!["go"]));
    let s2 = compiled.state_key("s2").expect("s2 exists");
    assert!(compiled.is_terminal(&s2));
    assert!(compiled.applicable_actions(&s2).is_empty());
    assert_eq!(compiled.affordance_count(), 0);
}

#[test]
fn compiled_model_answers_transition_queries() {
    let compiled = compile(FORK_YAML).expect("compile should succeed");
    let s0 = compiled.start();
    let s2 = compiled.state_key("s2").expect("s2 exists");

    let transitions = compiled.transitions(&s0, &"big".to_string());

    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[0].next, s2);
    assert_eq!(transitions[0].probability, 0.5);
    assert_eq!(compiled.reward(&s0, &"big".to_string(), &s2), 10.0);
    assert_eq!(compiled.reward(&s0, &"big".to_string(), &s0), 0.0);
    assert!(compiled.transitions(&s0, &"fly".to_string()).is_empty());
    assert_eq!(compiled.tags(s0), Some(&["fork".to_string()][..]));
}

#[test]
fn value_iteration_solves_the_yaml_chain() {
    let compiled = compile(CHAIN_YAML).expect("compile should succeed");
    let s0 = compiled.start();
    let s1 = compiled.state_key("s1").expect("s1 exists");
    let s2 = compiled.state_key("s2").expect("s2 exists");
    let mut vi = planner(compiled, 0.9);

    let report = vi.plan_from_state(&s0).expect("planning should succeed");

    assert_eq!(report.sweeps.outcome, SweepOutcome::Converged);
    assert_eq!(vi.value(&s2), 0.0);
    assert_relative_eq!(vi.value(&s1), -1.0, epsilon = 1e-12);
    assert_relative_eq!(vi.value(&s0), -1.9, epsilon = 1e-12);
    let mut policy = GreedyPolicy::deterministic(&vi);
    assert_eq!(policy.action(&s0).expect("action"), Some("go".to_string()));
}

#[test]
fn yaml_affordances_prune_the_planner() {
    let compiled = compile(FORK_YAML).expect("compile should succeed");
    let s0 = compiled.start();
    let s2 = compiled.state_key("s2").expect("s2 exists");

    let mut free = planner(compiled.clone(), 0.9);
    free.plan_from_state(&s0).expect("planning should succeed");
    assert_eq!(
        GreedyPolicy::deterministic(&free)
            .action(&s0)
            .expect("action"),
        Some("big".to_string())
    );

    let affordances = compiled.affordances();
    let mut pruned = planner(compiled, 0.9).with_affordances(affordances);
    pruned
        .plan_from_state(&s0)
        .expect("planning should succeed");

    let entry = pruned.cache().entry(&s0).expect("start is cached");
    assert_eq!(entry.actions().len(), 1);
    assert_eq!(entry.actions()[0].action(), "small");
    assert!(!pruned.cache().contains(&s2));
    assert_relative_eq!(pruned.value(&s0), 1.0, epsilon = 1e-12);
    let distribution = GreedyPolicy::uniform(&pruned, 3)
        .action_distribution(&s0)
        .expect("distribution should be defined");
    assert_eq!(distribution.len(), 1);
    assert_eq!(distribution[0].probability, 1.0);
}

#[test]
fn predicates_combine_over_states_and_tags() {
    let mut builder = MdpBuilder::new();
    builder
        .set_start("a")
        .add_state("a", false)
        .add_state("b", false);
    builder.add_state("goal", true);
    builder.add_tag("a", "start").expect("a exists");
    for state in ["a", "b"] {
        builder.add_action(state, "left").expect("state exists");
        builder
            .add_outcome(state, "left", "a", 1.0, 0.0)
            .expect("action exists");
        builder.add_action(state, "right").expect("state exists");
        builder
            .add_outcome(state, "right", "goal", 1.0, 1.0)
            .expect("action exists");
    }
    builder.add_affordance(
        StatePredicate::Any {
            predicates: vec![
                StatePredicate::has_tag("start"),
                StatePredicate::state_is("b").negate().negate(),
            ],
        },
        ["left"],
    );

    let compiled = builder.compile().expect("compile should succeed");
    let affordances = compiled.affordances();
    let a = compiled.state_key("a").expect("a exists");
    let b = compiled.state_key("b").expect("b exists");
    let goal = compiled.state_key("goal").expect("goal exists");

    let actions = |key| affordances.filter(&key, compiled.applicable_actions(&key));
    assert_eq!(actions(a), vec!["left".to_string()]);
    assert_eq!(actions(b), vec!["left".to_string()]);
    assert!(actions(goal).is_empty());
}

#[test]
fn validation_fails_for_probability_sum() {
    let yaml = r#"
start: s0
states:
  - id: s0
    actions:
      - id: a0
        outcomes:
          - next: s0
            prob: 0.9
            reward: 1.0
"#;

    let err = compile(yaml).expect_err("compile should fail");

    assert!(matches!(err, MdpError::ProbabilitySum { .. }));
}

#[test]
fn validation_fails_for_unknown_state_reference() {
    let yaml = r#"
start: s0
states:
  - id: s0
    actions:
      - id: a0
        outcomes:
          - next: missing
            prob: 1.0
            reward: 1.0
"#;

    let err = compile(yaml).expect_err("compile should fail");

    assert!(matches!(err, MdpError::UnknownNextState { .. }));
}

#[test]
fn validation_fails_for_duplicate_outcome_target() {
    let yaml = r#"
start: s0
states:
  - id: s0
    actions:
      - id: a0
        outcomes:
          - next: s0
            prob: 0.5
            reward: 1.0
          - next: s0
            prob: 0.5
            reward: 2.0
"#;

    let err = compile(yaml).expect_err("compile should fail");

    assert!(matches!(err, MdpError::DuplicateOutcome { .. }));
}

#[test]
fn validation_fails_for_terminal_with_actions() {
    let yaml = r#"
start: s0
states:
  - id: s0
    terminal: true
    actions:
      - id: a0
        outcomes:
          - next: s0
            prob: 1.0
            reward: 0.0
"#;

    let err = compile(yaml).expect_err("compile should fail");

    assert!(matches!(err, MdpError::TerminalStateHasActions { .. }));
}

#[test]
fn validation_fails_for_bad_affordances() {
    let unknown_action = FORK_YAML.replace("actions: [small]", "actions: [jump]");
    let unknown_tag = FORK_YAML.replace("tag: fork\n    actions", "tag: nowhere\n    actions");
    let unknown_state = FORK_YAML.replace(
        "kind: has_tag\n      tag: fork",
        "kind: state_is\n      state: s9",
    );
    let empty = FORK_YAML.replace("actions: [small]", "actions: []");

    assert!(matches!(
        compile(&unknown_action),
        Err(MdpError::UnknownAffordanceAction { index: 0, .. })
    ));
    assert!(matches!(
        compile(&unknown_tag),
        Err(MdpError::UnknownTag { .. })
    ));
    assert!(matches!(
        compile(&unknown_state),
        Err(MdpError::UnknownPredicateState { .. })
    ));
    assert!(matches!(
        compile(&empty),
        Err(MdpError::EmptyAffordance { index: 0 })
    ));
}

#[test]
fn builder_rejects_unknown_references() {
    let mut builder = MdpBuilder::new();
    builder.add_state("s0", false);

    assert!(matches!(
        builder.add_action("nope", "a"),
        Err(MdpError::BuilderUnknownState { .. })
    ));
    assert!(matches!(
        builder.add_outcome("s0", "a", "s0", 1.0, 0.0),
        Err(MdpError::BuilderUnknownAction { .. })
    ));
    assert!(matches!(
        MdpBuilder::new().build_spec(),
        Err(MdpError::MissingStart)
    ));
}

#[test]
fn yaml_round_trip_through_a_file() {
    let spec = MdpSpec::from_yaml_str(FORK_YAML).expect("valid yaml");
    let path =
        std::env::temp_dir().join(format!("tabvi-mdp-roundtrip-{}.yaml", std::process::id()));

    save_yaml(&path, &spec).expect("save should succeed");
    let loaded = load_yaml(&path).expect("load should succeed");
    std::fs::remove_file(&path).expect("cleanup should succeed");

    assert_eq!(loaded.start, "s0");
    assert_eq!(loaded.states.len(), 3);
    assert_eq!(loaded.states[0].tags, Some(vec!["fork".to_string()]));
    let affordances = loaded.affordances.as_deref().expect("affordances survive");
    assert_eq!(affordances[0].when, StatePredicate::has_tag("fork"));
    assert_eq!(affordances[0].actions, vec!["small".to_string()]);
    assert_eq!(
        loaded
            .compile()
            .expect("compile should succeed")
            .affordance_count(),
        1
    );
}

#[test]
fn unknown_state_key_is_a_dead_end() {
    let compiled = compile(CHAIN_YAML).expect("compile should succeed");
    let mut vi = planner(compiled, 0.9);

    let report = vi
        .explore(&[tabvi_mdp::StateKey::from(99)])
        .expect("an unknown key has no actions");

    assert_eq!(report.expanded, 1);
    assert!(matches!(vi.q_values(&tabvi_mdp::StateKey::from(99)), Ok(q) if q.is_empty()));
    let err = GreedyPolicy::deterministic(&vi).action_distribution(&tabvi_mdp::StateKey::from(99));
    assert!(matches!(err, Err(PlanError::EmptyActionSet { .. })));
}

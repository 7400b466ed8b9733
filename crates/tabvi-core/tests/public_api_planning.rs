use approx::assert_relative_eq;
use tabvi_core::{
    GreedyPolicy, IdentityHasher, MdpModel, PlannerConfig, PlannerStatus, SweepOutcome, Transition,
    ValueIteration,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Machine {
    Working,
    Broken,
}

#[derive(Debug, Clone, PartialEq)]
enum Choice {
    Run,
    Repair,
}

struct Maintenance;

impl MdpModel for Maintenance {
    type State = Machine;
    type Action = Choice;

    fn is_terminal(&self, _state: &Machine) -> bool {
        false
    }

    fn applicable_actions(&self, _state: &Machine) -> Vec<Choice> {
        vec![Choice::Run, Choice::Repair]
    }

    fn transitions(&self, state: &Machine, action: &Choice) -> Vec<Transition<Machine>> {
        match (state, action) {
            (Machine::Working, Choice::Run) => vec![
                Transition::new(Machine::Working, 0.9),
                Transition::new(Machine::Broken, 0.1),
            ],
            (Machine::Broken, Choice::Run) => vec![Transition::certain(Machine::Broken)],
            (_, Choice::Repair) => vec![Transition::certain(Machine::Working)],
        }
    }

    fn reward(&self, state: &Machine, action: &Choice, _next: &Machine) -> f64 {
        match (state, action) {
            (Machine::Working, Choice::Run) => 10.0,
            (Machine::Broken, Choice::Run) => 0.0,
            (Machine::Working, Choice::Repair) => 0.0,
            (Machine::Broken, Choice::Repair) => -5.0,
        }
    }
}

fn planner() -> ValueIteration<Maintenance, IdentityHasher> {
    ValueIteration::new(
        Maintenance,
        IdentityHasher,
        PlannerConfig::new(0.9, 1e-10, 10_000),
    )
    .expect("config should be valid")
}

#[test]
fn public_planning_finds_the_maintenance_policy() {
    let mut vi = planner();

    let report = vi
        .plan_from_state(&Machine::Working)
        .expect("planning should succeed");

    assert_eq!(report.sweeps.outcome, SweepOutcome::Converged);
    assert_eq!(vi.status(), PlannerStatus::Converged);
    assert_eq!(vi.cache().len(), 2);

    let working = 9.55 / 0.109;
    assert_relative_eq!(vi.value(&Machine::Working), working, epsilon = 1e-6);
    assert_relative_eq!(
        vi.value(&Machine::Broken),
        -5.0 + 0.9 * working,
        epsilon = 1e-6
    );

    let mut policy = GreedyPolicy::deterministic(&vi);
    assert_eq!(
        policy.action(&Machine::Working).expect("action"),
        Some(Choice::Run)
    );
    assert_eq!(
        policy.action(&Machine::Broken).expect("action"),
        Some(Choice::Repair)
    );
}

#[test]
fn public_sweep_hook_sees_every_sweep() {
    let mut vi = planner();
    vi.explore(&[Machine::Broken])
        .expect("exploration should succeed");
    let mut sweeps = 0;

    let report = vi
        .run_sweeps_with_hook(|metrics| {
            sweeps += 1;
            assert_eq!(metrics.iteration, sweeps);
            assert_eq!(metrics.states_updated, 2);
            tabvi_core::SweepControl::Continue
        })
        .expect("sweeps should succeed");

    assert_eq!(report.iterations, sweeps);
    assert!(report.final_delta < 1e-10);
}

#[test]
fn public_snapshot_lists_both_machine_states() {
    let mut vi = planner();
    vi.plan_from_state(&Machine::Working)
        .expect("planning should succeed");

    let snapshot = vi.snapshot();

    let keys: Vec<_> = snapshot.states.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["Working", "Broken"]);
    assert!(snapshot.states.iter().all(|s| s.actions.len() == 2));
}

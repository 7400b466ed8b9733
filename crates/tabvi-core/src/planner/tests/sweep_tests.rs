use approx::assert_relative_eq;

use crate::{
    IdentityHasher, PlanError, PlannerConfig, PlannerStatus, SweepControl, SweepOutcome,
    ValueIteration,
};

use super::support::{TableMdp, chain, planner};

#[test]
fn chain_values_match_the_closed_form() {
    let mut vi = planner(chain(), 0.9);

    let report = vi.plan_from_state(&0).expect("planning should succeed");

    assert_eq!(report.sweeps.outcome, SweepOutcome::Converged);
    assert_eq!(report.sweeps.iterations, 3);
    assert_eq!(report.sweeps.final_delta, 0.0);
    assert_eq!(vi.status(), PlannerStatus::Converged);
    assert_relative_eq!(vi.value(&1), -1.0, epsilon = 1e-12);
    assert_relative_eq!(vi.value(&0), -1.9, epsilon = 1e-12);
    assert_eq!(vi.value(&2), 0.0);
}

#[test]
fn sweeps_before_exploration_are_rejected() {
    let mut vi = planner(chain(), 0.9);

    assert!(matches!(vi.run_sweeps(), Err(PlanError::NotInitialized)));
}

#[test]
fn terminal_states_are_worth_zero_whatever_the_default() {
    let config = PlannerConfig {
        default_value: 5.0,
        ..PlannerConfig::new(0.9, 1e-9, 1000)
    };
    let mut vi = ValueIteration::new(chain(), IdentityHasher, config).expect("config is valid");

    vi.plan_from_state(&0).expect("planning should succeed");

    assert_eq!(vi.value(&2), 0.0);
    assert_relative_eq!(vi.value(&0), -1.9, epsilon = 1e-12);
    assert_eq!(vi.value(&42), 5.0);
}

#[test]
fn better_stochastic_action_wins() {
    let mdp = TableMdp::new()
        .edge(0, "safe", &[(1, 1.0)], 1.0)
        .edge(0, "risky", &[(1, 0.5), (2, 0.5)], 3.0)
        .terminal(1)
        .terminal(2);
    let mut vi = planner(mdp, 0.95);

    vi.plan_from_state(&0).expect("planning should succeed");

    assert_relative_eq!(vi.value(&0), 3.0, epsilon = 1e-12);
}

#[test]
fn self_loop_hits_the_iteration_cap() {
    let mdp = TableMdp::new().edge(0, "stay", &[(0, 1.0)], 1.0);
    let mut vi = ValueIteration::new(mdp, IdentityHasher, PlannerConfig::new(0.99, 1e-9, 5))
        .expect("config is valid");

    let report = vi.plan_from_state(&0).expect("planning should succeed");

    assert_eq!(report.sweeps.outcome, SweepOutcome::IterationLimitReached);
    assert_eq!(report.sweeps.iterations, 5);
    assert_eq!(vi.status(), PlannerStatus::IterationLimitReached);
    // V_k = 1 + 0.99 V_{k-1}, starting from 0.
    let expected = (1.0 - 0.99_f64.powi(5)) / (1.0 - 0.99);
    assert_relative_eq!(vi.value(&0), expected, epsilon = 1e-9);
}

#[test]
fn hook_can_stop_the_loop_early() {
    let mdp = TableMdp::new().edge(0, "stay", &[(0, 1.0)], 1.0);
    let mut vi = planner(mdp, 0.99);
    vi.explore(&[0]).expect("exploration should succeed");
    let mut seen = Vec::new();

    let report = vi
        .run_sweeps_with_hook(|metrics| {
            seen.push((metrics.iteration, metrics.delta, metrics.states_updated));
            if metrics.iteration == 2 {
                SweepControl::Stop
            } else {
                SweepControl::Continue
            }
        })
        .expect("sweeps should succeed");

    assert_eq!(report.outcome, SweepOutcome::Stopped);
    assert_eq!(report.iterations, 2);
    assert_eq!(vi.status(), PlannerStatus::Stopped);
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (1, 1.0, 1));
    assert_relative_eq!(seen[1].1, 0.99, epsilon = 1e-12);
}

#[test]
fn dead_end_state_keeps_its_value() {
    let config = PlannerConfig {
        default_value: -3.0,
        ..PlannerConfig::new(0.9, 1e-9, 100)
    };
    let mdp = TableMdp::new().edge(0, "go", &[(1, 1.0)], 2.0);
    let mut vi = ValueIteration::new(mdp, IdentityHasher, config).expect("config is valid");

    let report = vi.plan_from_state(&0).expect("planning should succeed");

    assert_eq!(report.sweeps.outcome, SweepOutcome::Converged);
    assert_eq!(vi.value(&1), -3.0);
    assert_relative_eq!(vi.value(&0), 2.0 + 0.9 * -3.0, epsilon = 1e-12);
}

#[test]
fn planning_again_reuses_the_cache_and_still_sweeps() {
    let mut vi = planner(chain(), 0.9);
    vi.plan_from_state(&0).expect("first plan should succeed");

    let report = vi.plan_from_state(&0).expect("second plan should succeed");

    assert!(!report.exploration.performed());
    assert_eq!(report.sweeps.outcome, SweepOutcome::Converged);
    assert_eq!(report.sweeps.iterations, 1);
    assert_relative_eq!(vi.value(&0), -1.9, epsilon = 1e-12);
}

#[test]
fn planning_from_a_predecessor_extends_the_cache() {
    let mut vi = planner(chain(), 0.9);
    vi.plan_from_state(&1).expect("plan from 1 should succeed");
    assert_eq!(vi.cache().len(), 2);

    let report = vi.plan_from_state(&0).expect("plan from 0 should succeed");

    assert_eq!(report.exploration.new_states, 1);
    assert_eq!(vi.cache().len(), 3);
    assert_relative_eq!(vi.value(&0), -1.9, epsilon = 1e-12);
}

#[test]
fn several_start_states_are_planned_together() {
    let mdp = chain().edge(5, "go", &[(2, 1.0)], -4.0);
    let mut vi = planner(mdp, 0.9);

    vi.plan_from_states(&[0, 5])
        .expect("planning should succeed");

    assert_eq!(vi.cache().len(), 4);
    assert_relative_eq!(vi.value(&5), -4.0, epsilon = 1e-12);
    assert_relative_eq!(vi.value(&0), -1.9, epsilon = 1e-12);
}

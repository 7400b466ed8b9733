use std::path::PathBuf;

use tabvi_core::{GreedyPolicy, IdentityHasher, MdpModel, PlannerConfig, ValueIteration};
use tabvi_mdp::compile_yaml;

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/tabvi-mdp/examples/chain.mdp.yaml"));

    let compiled = compile_yaml(&path).expect("failed to compile MDP YAML");
    let start = compiled.start();
    let affordances = compiled.affordances();
    let config = PlannerConfig::from_default_yaml().expect("bundled planner config is valid");

    let mut planner = ValueIteration::new(compiled, IdentityHasher, config)
        .expect("planner config is valid")
        .with_affordances(affordances);
    let report = planner
        .plan_from_state(&start)
        .expect("value iteration failed");

    println!(
        "states={} sweeps={} outcome={:?} final_delta={:.3e}",
        planner.cache().len(),
        report.sweeps.iterations,
        report.sweeps.outcome,
        report.sweeps.final_delta
    );

    let mut policy = GreedyPolicy::deterministic(&planner);
    for entry in planner.cache() {
        let state = *entry.key();
        let id = planner.mdp().state_id(state).unwrap_or("?");
        if planner.mdp().is_terminal(&state) {
            println!("{id}: terminal");
            continue;
        }
        let action = policy.action(&state).expect("policy lookup failed");
        println!(
            "{id}: value={:.4} action={}",
            planner.value(&state),
            action.as_deref().unwrap_or("-")
        );
    }
}

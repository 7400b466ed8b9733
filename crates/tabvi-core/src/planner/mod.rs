pub mod affordance;
pub mod backup;
pub mod cache;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod policy;
pub mod reachability;
pub mod snapshot;
pub mod transition;
pub mod value_iteration;
pub mod values;

#[cfg(test)]
mod tests;

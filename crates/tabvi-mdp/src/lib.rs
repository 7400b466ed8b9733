//! Explicit tabular MDPs described in YAML or built in code.
//!
//! A `CompiledMdp` implements `tabvi_core::MdpModel`, so it can be planned with
//! `ValueIteration` and an `IdentityHasher` over its `StateKey`s.

mod builder;
mod compiled;
mod error;
mod io;
mod predicate;
mod spec;

pub use builder::MdpBuilder;
pub use compiled::{CompiledMdp, StateKey};
pub use error::MdpError;
pub use io::{compile_yaml, load_yaml, save_yaml};
pub use predicate::StatePredicate;
pub use spec::{ActionSpec, AffordanceSpec, MdpSpec, OutcomeSpec, StateSpec};

//! Object-oriented states.
//!
//! A state is a flat arena of named objects. Each object belongs to a class and its attribute
//! values live in that class's contiguous value array, so states carry no internal pointers
//! and clone cheaply into successor states.

pub mod action;
pub mod error;
pub mod object_state;
pub mod predicate;
pub mod schema;

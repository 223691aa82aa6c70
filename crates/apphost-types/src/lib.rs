//! Value and type model for apphost.
//!
//! Operations in the generator accept loosely shaped arguments: plain
//! strings, tuples, records of named fields, handles to earlier resources.
//! This crate defines the dynamic [`Value`] those arguments arrive as, the
//! [`TypeDesc`] descriptors that declare what an operation accepts, and the
//! [`matches`] predicate that decides whether one satisfies the other.

mod matcher;
mod types;
mod value;

pub use matcher::{explain, matches, Mismatch};
pub use types::{Field, Primitive, TypeDesc};
pub use value::{Capabilities, ResourceRef, Value};

//! Intermediate representation for alias generation
//!
//! This module provides the type system and metadata structures for
//! describing tool functions and their script-side aliases.

pub mod descriptor;
pub mod registry;
pub mod types;

pub use descriptor::*;
pub use registry::*;
pub use types::*;

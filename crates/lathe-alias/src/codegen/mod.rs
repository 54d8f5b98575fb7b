//! Code generation for the alias surface
//!
//! This module provides generators for:
//! - Single forwarding declarations (one per alias)
//! - The complete script prelude (declarations, interfaces, aliases)

pub mod alias;
pub mod surface;

pub use alias::{generate_alias, generate_all};
pub use surface::{SurfaceError, SurfaceGenerator};

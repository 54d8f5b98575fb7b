//! Compile-time descriptor inventory for tool crates
//!
//! This module provides the infrastructure for collecting alias descriptors
//! at compile time using the `linkme` crate's distributed slices.

use crate::ir::{FunctionDescriptor, StructDescriptor};

/// Distributed slice for collecting function descriptors at compile time
#[linkme::distributed_slice]
pub static ALIAS_FUNCTIONS: [fn() -> FunctionDescriptor];

/// Distributed slice for collecting settings struct descriptors at compile time
#[linkme::distributed_slice]
pub static ALIAS_STRUCTS: [fn() -> StructDescriptor];

/// Collect all registered function descriptors.
///
/// Link order varies between builds, so the result is sorted by alias name
/// to keep downstream generation deterministic.
pub fn collect_functions() -> Vec<FunctionDescriptor> {
    let mut functions: Vec<FunctionDescriptor> = ALIAS_FUNCTIONS.iter().map(|f| f()).collect();
    functions.sort_by(|a, b| a.name.cmp(&b.name));
    functions
}

/// Collect all registered struct descriptors, sorted by name.
pub fn collect_structs() -> Vec<StructDescriptor> {
    let mut structs: Vec<StructDescriptor> = ALIAS_STRUCTS.iter().map(|f| f()).collect();
    structs.sort_by(|a, b| a.name.cmp(&b.name));
    structs
}

/// Registry for manually collecting descriptors (alternative to linkme)
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    functions: Vec<FunctionDescriptor>,
    structs: Vec<StructDescriptor>,
}

impl DescriptorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from the distributed slices
    pub fn from_inventory() -> Self {
        Self {
            functions: collect_functions(),
            structs: collect_structs(),
        }
    }

    /// Register a function descriptor
    pub fn register_function(&mut self, f: FunctionDescriptor) {
        self.functions.push(f);
    }

    /// Register a struct descriptor
    pub fn register_struct(&mut self, s: StructDescriptor) {
        self.structs.push(s);
    }

    /// Get all registered functions
    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    /// Get all registered structs
    pub fn structs(&self) -> &[StructDescriptor] {
        &self.structs
    }

    /// Take ownership of the functions
    pub fn into_functions(self) -> Vec<FunctionDescriptor> {
        self.functions
    }
}

/// Macro to register a function descriptor in the distributed slice
#[macro_export]
macro_rules! register_alias {
    ($name:ident, $f:expr) => {
        #[linkme::distributed_slice($crate::ir::ALIAS_FUNCTIONS)]
        static $name: fn() -> $crate::ir::FunctionDescriptor = || $f;
    };
}

/// Macro to register a settings struct descriptor in the distributed slice
#[macro_export]
macro_rules! register_settings {
    ($name:ident, $s:expr) => {
        #[linkme::distributed_slice($crate::ir::ALIAS_STRUCTS)]
        static $name: fn() -> $crate::ir::StructDescriptor = || $s;
    };
}

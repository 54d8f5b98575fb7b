//! Lathe-Alias: alias metadata and script binding generation
//!
//! This crate provides the glue between Rust tool functions and the build
//! script surface. Tool functions are described by descriptors, checked by
//! the alias validator, and rendered into forwarding declarations that hide
//! the ambient build context from script authors.
//!
//! # Architecture
//!
//! - `ir`: descriptors, the script type system, and the compile-time registry
//! - `validate`: eligibility rules producing a [`ValidDescriptor`] witness
//! - `signature`: declaration/call shape derivation
//! - `codegen`: single-alias emission and the full prelude generator
//!
//! # Usage
//!
//! ```rust
//! use lathe_alias::ir::{FunctionDescriptor, ParameterDescriptor, ScriptType};
//!
//! let descriptor = FunctionDescriptor::from_wire_name("npm_pack")
//!     .in_container("tool_npm::aliases")
//!     .context_extension()
//!     .alias_tagged()
//!     .param(ParameterDescriptor::new("packageDir", ScriptType::string()))
//!     .returns(ScriptType::string());
//!
//! let alias = lathe_alias::generate_alias(&descriptor).unwrap();
//! assert!(alias.contains("export function npmPack(packageDir: string): string"));
//! ```

pub mod codegen;
pub mod ir;
pub mod signature;
pub mod validate;

/// Name of the ambient context accessor in generated code.
pub const CONTEXT_ACCESSOR: &str = "getContext";

/// Name of the namespace object the wire bindings hang off in generated code.
pub const WIRE_NAMESPACE: &str = "lib";

// Re-export commonly used types
pub use codegen::{generate_alias, generate_all, SurfaceError, SurfaceGenerator};
pub use ir::{
    collect_functions, collect_structs, DescriptorRegistry, FieldDescriptor, FunctionDescriptor,
    ParameterDescriptor, ScriptPrimitive, ScriptType, StructDescriptor, ALIAS_FUNCTIONS,
    ALIAS_STRUCTS,
};
pub use signature::AliasSignature;
pub use validate::{validate, ValidDescriptor, ValidationError};

// Re-export linkme for the registration macros
pub use linkme;

//! Proc macros for lathe-alias
//!
//! Provides attribute macros for annotating tool functions and settings
//! structs with the metadata the alias generator consumes.
//!
//! # Usage
//!
//! ```text
//! use lathe_alias_macro::{alias_settings, method_alias};
//!
//! #[alias_settings]
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! pub struct CargoBuildSettings {
//!     pub manifest_path: String,
//!     pub jobs: Option<u32>,
//! }
//!
//! #[method_alias]
//! pub fn cargo_build(context: &BuildContext, settings: CargoBuildSettings) -> Result<(), ToolError> {
//!     // ...
//! }
//! ```

use proc_macro::TokenStream;

mod alias_settings;
mod method_alias;
mod type_parser;

/// Attribute macro tagging a tool function as a script alias
///
/// This macro:
/// 1. Leaves the original function unchanged (apart from stripping
///    `#[variadic]` parameter markers)
/// 2. Generates a companion function that returns the alias descriptor
/// 3. Registers the descriptor in the lathe-alias inventory
///
/// The function's first parameter should be `&BuildContext`; the validator
/// rejects descriptors where it is not. `Result<T, E>` return types surface
/// as `T` in the script, with errors thrown at the call site.
///
/// # Attributes
/// - `#[method_alias]` - Script name derived from the function name
/// - `#[method_alias(name = "customName")]` - Custom script name
///
/// # Variadic parameters
///
/// Mark a trailing `Vec<T>` parameter with `#[variadic]` to expose it with
/// repeatable syntax in the script:
///
/// ```text
/// #[method_alias]
/// pub fn npm_run(
///     context: &BuildContext,
///     script: String,
///     #[variadic] args: Vec<String>,
/// ) -> Result<(), ToolError> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn method_alias(attr: TokenStream, item: TokenStream) -> TokenStream {
    method_alias::method_alias_impl(attr.into(), item.into()).into()
}

/// Attribute macro exposing a settings struct to the script surface
///
/// This macro:
/// 1. Leaves the original struct unchanged
/// 2. Generates a companion function that returns the struct descriptor
/// 3. Registers the descriptor in the lathe-alias inventory
///
/// # Attributes
/// - `#[alias_settings]` - Interface name is the struct name
/// - `#[alias_settings(name = "CustomName")]` - Custom interface name
///
/// # Example
/// ```text
/// #[alias_settings]
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// pub struct NpmPackSettings {
///     pub destination: Option<String>,
///     pub quiet: bool,
/// }
/// ```
#[proc_macro_attribute]
pub fn alias_settings(attr: TokenStream, item: TokenStream) -> TokenStream {
    alias_settings::alias_settings_impl(attr.into(), item.into()).into()
}

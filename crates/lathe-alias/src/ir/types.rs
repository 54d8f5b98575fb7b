//! Type system for alias signatures
//!
//! This module provides the type representations for mapping tool-side
//! Rust types to script types in the generated alias surface.
//!
//! # Type Mapping Overview
//!
//! | Rust Type | Script Type | Notes |
//! |-----------|-------------|-------|
//! | `()` | `void` | Unit / no value |
//! | `bool` | `boolean` | Direct mapping |
//! | integer types | `number` | Safe integer range |
//! | `f32`, `f64` | `number` | IEEE 754 double precision |
//! | `String`, `&str` | `string` | Owned and borrowed strings |
//! | `Option<T>` | `T \| null` | Nullable types |
//! | `Vec<T>` | `T[]` | Generic array |
//! | `BTreeMap<K, V>` | `Record<K, V>` | Key-value map |
//! | settings structs | interface name | Declared via [`StructDescriptor`] |
//! | generic parameter | `T` | Preserved verbatim |
//! | `BuildContext` | _filtered_ | Ambient context, removed from alias params |
//!
//! Unsupported types fall back to [`ScriptType::Unknown`].
//!
//! [`StructDescriptor`]: crate::ir::StructDescriptor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive script types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptPrimitive {
    /// No value; only meaningful as a return type.
    Unit,
    Bool,
    Int,
    Float,
    String,
}

impl ScriptPrimitive {
    /// Convert to the script type name.
    pub fn to_typescript(&self) -> &'static str {
        match self {
            ScriptPrimitive::Unit => "void",
            ScriptPrimitive::Bool => "boolean",
            ScriptPrimitive::Int | ScriptPrimitive::Float => "number",
            ScriptPrimitive::String => "string",
        }
    }
}

impl fmt::Display for ScriptPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_typescript())
    }
}

/// Composite script types with generics support.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScriptType {
    /// Primitive type
    Primitive(ScriptPrimitive),

    /// Option<T> -> T | null
    Option(Box<ScriptType>),

    /// Vec<T> -> T[]
    List(Box<ScriptType>),

    /// Map<K, V> -> Record<K, V>
    Map {
        key: Box<ScriptType>,
        value: Box<ScriptType>,
    },

    /// Named type reference, e.g. a settings interface: Foo<T> -> Foo<T>
    Named {
        name: String,
        params: Vec<ScriptType>,
    },

    /// A generic type parameter of the enclosing function, preserved verbatim
    TypeParam(String),

    /// The ambient build context (filtered from alias parameter lists)
    Context,

    /// Unknown/any type (fallback)
    #[default]
    Unknown,
}

impl ScriptType {
    /// Convert to the script type string.
    pub fn to_typescript(&self) -> String {
        match self {
            ScriptType::Primitive(p) => p.to_typescript().to_string(),

            ScriptType::Option(inner) => format!("{} | null", inner.to_typescript()),

            ScriptType::List(inner) => format!("{}[]", inner.to_typescript_with_parens()),

            ScriptType::Map { key, value } => {
                format!("Record<{}, {}>", key.to_typescript(), value.to_typescript())
            }

            ScriptType::Named { name, params } => {
                if params.is_empty() {
                    name.clone()
                } else {
                    let args: Vec<String> = params.iter().map(|t| t.to_typescript()).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }

            ScriptType::TypeParam(name) => name.clone(),

            ScriptType::Context => "BuildContext".to_string(),

            ScriptType::Unknown => "unknown".to_string(),
        }
    }

    /// Convert to the script type with parentheses if needed (for arrays).
    fn to_typescript_with_parens(&self) -> String {
        match self {
            ScriptType::Option(_) => format!("({})", self.to_typescript()),
            _ => self.to_typescript(),
        }
    }

    /// Check if this is the ambient context type.
    pub fn is_context(&self) -> bool {
        matches!(self, ScriptType::Context)
    }

    /// Check if this is the unit/no-value type.
    pub fn is_unit(&self) -> bool {
        matches!(self, ScriptType::Primitive(ScriptPrimitive::Unit))
    }

    /// Create a string type.
    pub fn string() -> Self {
        ScriptType::Primitive(ScriptPrimitive::String)
    }

    /// Create a boolean type.
    pub fn bool() -> Self {
        ScriptType::Primitive(ScriptPrimitive::Bool)
    }

    /// Create a number type.
    pub fn int() -> Self {
        ScriptType::Primitive(ScriptPrimitive::Int)
    }

    /// Create a void/unit type.
    pub fn void() -> Self {
        ScriptType::Primitive(ScriptPrimitive::Unit)
    }

    /// Create an Option<T> type.
    pub fn option(inner: ScriptType) -> Self {
        ScriptType::Option(Box::new(inner))
    }

    /// Create a list type.
    pub fn list(inner: ScriptType) -> Self {
        ScriptType::List(Box::new(inner))
    }

    /// Create a map type.
    pub fn map(key: ScriptType, value: ScriptType) -> Self {
        ScriptType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create a named type reference without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        ScriptType::Named {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Create a reference to a generic type parameter.
    pub fn type_param(name: impl Into<String>) -> Self {
        ScriptType::TypeParam(name.into())
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_typescript())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_typescript() {
        assert_eq!(ScriptPrimitive::Unit.to_typescript(), "void");
        assert_eq!(ScriptPrimitive::Bool.to_typescript(), "boolean");
        assert_eq!(ScriptPrimitive::Int.to_typescript(), "number");
        assert_eq!(ScriptPrimitive::String.to_typescript(), "string");
    }

    #[test]
    fn test_composite_types() {
        // Option<string> -> string | null
        let opt = ScriptType::option(ScriptType::string());
        assert_eq!(opt.to_typescript(), "string | null");

        // Vec<string> -> string[]
        let list = ScriptType::list(ScriptType::string());
        assert_eq!(list.to_typescript(), "string[]");

        // Vec<Option<string>> -> (string | null)[]
        let nested = ScriptType::list(ScriptType::option(ScriptType::string()));
        assert_eq!(nested.to_typescript(), "(string | null)[]");

        // Map<string, string[]> -> Record<string, string[]>
        let map = ScriptType::map(ScriptType::string(), ScriptType::list(ScriptType::string()));
        assert_eq!(map.to_typescript(), "Record<string, string[]>");
    }

    #[test]
    fn test_named_and_type_params() {
        let settings = ScriptType::named("CargoBuildSettings");
        assert_eq!(settings.to_typescript(), "CargoBuildSettings");

        let generic = ScriptType::Named {
            name: "Wrapper".to_string(),
            params: vec![ScriptType::type_param("T")],
        };
        assert_eq!(generic.to_typescript(), "Wrapper<T>");

        assert_eq!(ScriptType::type_param("T").to_typescript(), "T");
    }

    #[test]
    fn test_context_is_filtered_marker() {
        assert!(ScriptType::Context.is_context());
        assert!(!ScriptType::string().is_context());
        assert_eq!(ScriptType::Context.to_typescript(), "BuildContext");
    }
}

//! Descriptor metadata for alias functions and settings structs
//!
//! This module provides the metadata structures describing tool functions
//! that will be exposed to build scripts as aliases.

use crate::ir::ScriptType;
use serde::{Deserialize, Serialize};

/// Parameter metadata for an alias function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name as it appears in the script (camelCase).
    pub name: String,
    /// Parameter type. For variadic parameters this is the element type.
    pub ty: ScriptType,
    /// Whether this parameter collects the remaining arguments.
    pub is_variadic: bool,
    /// Documentation comment.
    pub doc: Option<String>,
}

impl ParameterDescriptor {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, ty: ScriptType) -> Self {
        Self {
            name: name.into(),
            ty,
            is_variadic: false,
            doc: None,
        }
    }

    /// Create the ambient context parameter.
    pub fn context() -> Self {
        Self::new("context", ScriptType::Context)
    }

    /// Mark as variadic. The type becomes the element type.
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Check if this is the ambient context parameter.
    pub fn is_context(&self) -> bool {
        self.ty.is_context()
    }

    /// Script declaration for the alias parameter list.
    ///
    /// Variadic parameters use repeatable syntax over the element type,
    /// e.g. `...scripts: string[]`.
    pub fn to_declaration(&self) -> String {
        if self.is_variadic {
            let array = ScriptType::list(self.ty.clone());
            format!("...{}: {}", self.name, array.to_typescript())
        } else {
            format!("{}: {}", self.name, self.ty.to_typescript())
        }
    }

    /// Script declaration for the wire signature.
    ///
    /// The wire function receives the collected array, so a variadic
    /// parameter appears as a plain array here.
    pub fn to_wire_declaration(&self) -> String {
        if self.is_variadic {
            let array = ScriptType::list(self.ty.clone());
            format!("{}: {}", self.name, array.to_typescript())
        } else {
            format!("{}: {}", self.name, self.ty.to_typescript())
        }
    }
}

/// Metadata for a single tool function that may be exposed as an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Alias name exported to the script (e.g. "cargoBuild").
    pub name: String,
    /// Wire binding name the alias forwards to (e.g. "cargo_build").
    pub wire_name: String,
    /// Rust path of the container the function is declared in.
    pub container: String,
    /// Whether the container is a module-level (static) declaration.
    pub container_is_static: bool,
    /// Whether the function takes the ambient context as its first parameter.
    pub is_context_extension: bool,
    /// Whether the function is tagged as a method alias.
    pub is_alias_tagged: bool,
    /// Generic type parameters, carried verbatim into the alias.
    pub type_params: Vec<String>,
    /// Parameters, including the context parameter when present.
    pub params: Vec<ParameterDescriptor>,
    /// Return type; unit means the alias is procedure-shaped.
    pub return_type: ScriptType,
    /// Documentation comment.
    pub doc: Option<String>,
}

impl FunctionDescriptor {
    /// Create a new descriptor.
    pub fn new(wire_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wire_name: wire_name.into(),
            container: String::new(),
            container_is_static: true,
            is_context_extension: false,
            is_alias_tagged: false,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: ScriptType::void(),
            doc: None,
        }
    }

    /// Create from just the wire name (auto-generate the alias name).
    pub fn from_wire_name(wire_name: impl Into<String>) -> Self {
        let wire_name = wire_name.into();
        let name = to_camel_case(&wire_name);
        Self::new(wire_name, name)
    }

    /// Set the container path.
    pub fn in_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Mark the container as a non-static declaration.
    pub fn instance_container(mut self) -> Self {
        self.container_is_static = false;
        self
    }

    /// Mark as a context extension and insert the context parameter.
    pub fn context_extension(mut self) -> Self {
        self.is_context_extension = true;
        self.params.insert(0, ParameterDescriptor::context());
        self
    }

    /// Tag as a method alias.
    pub fn alias_tagged(mut self) -> Self {
        self.is_alias_tagged = true;
        self
    }

    /// Add a parameter.
    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Add a generic type parameter.
    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// Set the return type.
    pub fn returns(mut self, ty: ScriptType) -> Self {
        self.return_type = ty;
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Parameters visible in the alias declaration (excludes context).
    pub fn visible_params(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.params.iter().filter(|p| !p.is_context())
    }

    /// Whether the alias returns a value.
    pub fn has_return(&self) -> bool {
        !self.return_type.is_unit()
    }

    /// Rendered type parameter list, e.g. `<T>`, or empty.
    pub fn type_param_list(&self) -> String {
        if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.type_params.join(", "))
        }
    }

    /// Wire signature for the declaration block, context parameter included.
    pub fn to_wire_signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.to_wire_declaration()).collect();
        format!(
            "{}{}({}): {}",
            self.wire_name,
            self.type_param_list(),
            params.join(", "),
            self.return_type.to_typescript()
        )
    }
}

/// Field metadata for a settings struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in the script (camelCase).
    pub name: String,
    /// Field type.
    pub ty: ScriptType,
    /// Whether this field may be omitted.
    pub optional: bool,
    /// Documentation comment.
    pub doc: Option<String>,
}

impl FieldDescriptor {
    /// Create a new field. `Option` types are optional automatically.
    pub fn new(name: impl Into<String>, ty: ScriptType) -> Self {
        let optional = matches!(&ty, ScriptType::Option(_));
        Self {
            name: name.into(),
            ty,
            optional,
            doc: None,
        }
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Script field declaration.
    pub fn to_typescript_field(&self) -> String {
        let optional = if self.optional { "?" } else { "" };

        // For Option<T>, unwrap to T (the optional marker handles nullability)
        let ty = match &self.ty {
            ScriptType::Option(inner) => inner.to_typescript(),
            _ => self.ty.to_typescript(),
        };

        format!("{}{}: {}", self.name, optional, ty)
    }
}

/// Metadata for a settings struct exposed to the script as an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDescriptor {
    /// Interface name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Generic type parameters.
    pub type_params: Vec<String>,
    /// Documentation comment.
    pub doc: Option<String>,
}

impl StructDescriptor {
    /// Create a new struct descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            type_params: Vec::new(),
            doc: None,
        }
    }

    /// Add a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add type parameters.
    pub fn with_type_params(mut self, params: Vec<String>) -> Self {
        self.type_params = params;
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Script interface declaration.
    pub fn to_typescript_interface(&self) -> String {
        let mut output = String::new();

        if let Some(doc) = &self.doc {
            output.push_str(&format!("/** {} */\n", doc));
        }

        let type_params = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.type_params.join(", "))
        };

        output.push_str(&format!("export interface {}{} {{\n", self.name, type_params));

        for field in &self.fields {
            if let Some(doc) = &field.doc {
                output.push_str(&format!("  /** {} */\n", doc));
            }
            output.push_str(&format!("  {};\n", field.to_typescript_field()));
        }

        output.push_str("}\n");
        output
    }
}

// Helper functions

/// Convert snake_case to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("cargo_build"), "cargoBuild");
        assert_eq!(to_camel_case("npm_pack_with"), "npmPackWith");
        assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
    }

    #[test]
    fn test_from_wire_name() {
        let f = FunctionDescriptor::from_wire_name("npm_install");
        assert_eq!(f.name, "npmInstall");
        assert_eq!(f.wire_name, "npm_install");
        assert!(f.container_is_static);
    }

    #[test]
    fn test_context_extension_inserts_context_first() {
        let f = FunctionDescriptor::from_wire_name("cargo_build")
            .param(ParameterDescriptor::new(
                "settings",
                ScriptType::named("CargoBuildSettings"),
            ))
            .context_extension();

        assert!(f.is_context_extension);
        assert!(f.params[0].is_context());
        let visible: Vec<&str> = f.visible_params().map(|p| p.name.as_str()).collect();
        assert_eq!(visible, vec!["settings"]);
    }

    #[test]
    fn test_variadic_parameter_declarations() {
        let p = ParameterDescriptor::new("scripts", ScriptType::string()).variadic();
        assert_eq!(p.to_declaration(), "...scripts: string[]");
        assert_eq!(p.to_wire_declaration(), "scripts: string[]");
    }

    #[test]
    fn test_wire_signature_keeps_context() {
        let f = FunctionDescriptor::from_wire_name("npm_pack")
            .context_extension()
            .param(ParameterDescriptor::new("packageDir", ScriptType::string()))
            .returns(ScriptType::string());

        assert_eq!(
            f.to_wire_signature(),
            "npm_pack(context: BuildContext, packageDir: string): string"
        );
    }

    #[test]
    fn test_generic_wire_signature() {
        let f = FunctionDescriptor::from_wire_name("cargo_metadata")
            .context_extension()
            .type_param("T")
            .param(ParameterDescriptor::new("manifestPath", ScriptType::string()))
            .returns(ScriptType::type_param("T"));

        assert_eq!(
            f.to_wire_signature(),
            "cargo_metadata<T>(context: BuildContext, manifestPath: string): T"
        );
    }

    #[test]
    fn test_struct_descriptor_interface() {
        let s = StructDescriptor::new("CargoBuildSettings")
            .field(FieldDescriptor::new("manifestPath", ScriptType::string()))
            .field(FieldDescriptor::new(
                "jobs",
                ScriptType::option(ScriptType::int()),
            ))
            .with_doc("Settings for cargo build");

        let ts = s.to_typescript_interface();
        assert!(ts.contains("export interface CargoBuildSettings"));
        assert!(ts.contains("manifestPath: string"));
        assert!(ts.contains("jobs?: number"));
    }
}

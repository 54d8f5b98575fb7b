//! Script prelude generator
//!
//! Assembles the complete alias surface handed to build scripts: the wire
//! declaration block, the settings interfaces, and one forwarding function
//! per alias.

use crate::codegen::alias;
use crate::ir::{FunctionDescriptor, StructDescriptor};
use crate::signature::AliasSignature;
use crate::validate::{validate, ValidationError};
use crate::{CONTEXT_ACCESSOR, WIRE_NAMESPACE};
use std::collections::HashSet;

/// Errors raised while assembling the full surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Two descriptors would be exported under the same name.
    #[error("duplicate alias name: {0}")]
    DuplicateAlias(String),

    /// Two settings structs would be exported under the same name.
    #[error("duplicate interface name: {0}")]
    DuplicateStruct(String),

    /// A descriptor failed alias validation.
    #[error("alias '{name}' rejected: {source}")]
    Rejected {
        /// Alias name of the rejected descriptor.
        name: String,
        /// The underlying rejection.
        #[source]
        source: ValidationError,
    },
}

/// Generator for the script-facing alias surface.
pub struct SurfaceGenerator<'a> {
    functions: &'a [FunctionDescriptor],
    structs: &'a [StructDescriptor],
}

impl<'a> SurfaceGenerator<'a> {
    /// Create a generator over the given descriptors.
    pub fn new(functions: &'a [FunctionDescriptor], structs: &'a [StructDescriptor]) -> Self {
        Self { functions, structs }
    }

    /// Generate the complete prelude source.
    ///
    /// Unlike batch alias generation, the surface is all or nothing: a
    /// rejected descriptor or a name collision fails the whole file.
    pub fn generate(&self) -> Result<String, SurfaceError> {
        self.check_names()?;

        let mut output = String::new();

        // File header comment
        output.push_str("// Lathe build prelude - generated tool aliases\n\n");

        // Wire declaration block
        output.push_str(&self.wire_declaration());
        output.push('\n');

        // Settings interfaces
        for s in self.structs {
            output.push_str(&s.to_typescript_interface());
            output.push('\n');
        }

        // Forwarding functions
        for f in self.functions {
            let valid = validate(f).map_err(|source| SurfaceError::Rejected {
                name: f.name.clone(),
                source,
            })?;
            output.push_str(&alias::emit(&AliasSignature::new(&valid)));
            output.push('\n');
        }

        Ok(output)
    }

    /// Generate the declaration block typing the ambient bindings.
    fn wire_declaration(&self) -> String {
        let mut output = String::new();

        output.push_str("/** Opaque handle to the running build. */\n");
        output.push_str("interface BuildContext {}\n\n");
        output.push_str(&format!(
            "declare function {}(): BuildContext;\n",
            CONTEXT_ACCESSOR
        ));
        output.push_str(&format!("declare const {}: {{\n", WIRE_NAMESPACE));

        for f in self.functions {
            output.push_str(&format!("  {};\n", f.to_wire_signature()));
        }

        output.push_str("};\n");
        output
    }

    /// Reject name collisions before any text is produced.
    fn check_names(&self) -> Result<(), SurfaceError> {
        let mut seen_names = HashSet::new();
        let mut seen_wire = HashSet::new();
        for f in self.functions {
            if !seen_names.insert(&f.name) {
                return Err(SurfaceError::DuplicateAlias(f.name.clone()));
            }
            if !seen_wire.insert(&f.wire_name) {
                return Err(SurfaceError::DuplicateAlias(f.wire_name.clone()));
            }
        }

        let mut seen_structs = HashSet::new();
        for s in self.structs {
            if !seen_structs.insert(&s.name) {
                return Err(SurfaceError::DuplicateStruct(s.name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FieldDescriptor, ParameterDescriptor, ScriptType};

    fn cargo_build() -> FunctionDescriptor {
        FunctionDescriptor::from_wire_name("cargo_build")
            .context_extension()
            .alias_tagged()
            .param(ParameterDescriptor::new(
                "settings",
                ScriptType::named("CargoBuildSettings"),
            ))
    }

    fn npm_pack() -> FunctionDescriptor {
        FunctionDescriptor::from_wire_name("npm_pack")
            .context_extension()
            .alias_tagged()
            .param(ParameterDescriptor::new("packageDir", ScriptType::string()))
            .returns(ScriptType::string())
    }

    fn build_settings() -> StructDescriptor {
        StructDescriptor::new("CargoBuildSettings")
            .field(FieldDescriptor::new("manifestPath", ScriptType::string()))
            .field(FieldDescriptor::new(
                "jobs",
                ScriptType::option(ScriptType::int()),
            ))
    }

    #[test]
    fn test_generate_prelude() {
        let functions = vec![cargo_build(), npm_pack()];
        let structs = vec![build_settings()];

        let output = SurfaceGenerator::new(&functions, &structs)
            .generate()
            .unwrap();

        assert!(output.starts_with("// Lathe build prelude"));
        assert!(output.contains("declare function getContext(): BuildContext;"));
        assert!(output.contains("declare const lib: {"));
        assert!(output
            .contains("  cargo_build(context: BuildContext, settings: CargoBuildSettings): void;"));
        assert!(output.contains("  npm_pack(context: BuildContext, packageDir: string): string;"));
        assert!(output.contains("export interface CargoBuildSettings {"));
        assert!(output.contains("jobs?: number;"));
        assert!(output.contains(
            "export function cargoBuild(settings: CargoBuildSettings): void {\n  \
             lib.cargo_build(getContext(), settings);\n}"
        ));
        assert!(output.contains(
            "export function npmPack(packageDir: string): string {\n  \
             return lib.npm_pack(getContext(), packageDir);\n}"
        ));
    }

    #[test]
    fn test_generation_deterministic() {
        let functions = vec![cargo_build(), npm_pack()];
        let structs = vec![build_settings()];
        let generator = SurfaceGenerator::new(&functions, &structs);
        assert_eq!(generator.generate().unwrap(), generator.generate().unwrap());
    }

    #[test]
    fn test_duplicate_alias_names() {
        let functions = vec![cargo_build(), cargo_build()];
        let err = SurfaceGenerator::new(&functions, &[]).generate().unwrap_err();
        assert_eq!(err, SurfaceError::DuplicateAlias("cargoBuild".to_string()));
    }

    #[test]
    fn test_duplicate_struct_names() {
        let structs = vec![build_settings(), build_settings()];
        let err = SurfaceGenerator::new(&[], &structs).generate().unwrap_err();
        assert_eq!(
            err,
            SurfaceError::DuplicateStruct("CargoBuildSettings".to_string())
        );
    }

    #[test]
    fn test_invalid_descriptor_fails_surface() {
        let functions = vec![cargo_build(), FunctionDescriptor::from_wire_name("npm_install")];
        let err = SurfaceGenerator::new(&functions, &[]).generate().unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::Rejected { ref name, .. } if name == "npmInstall"
        ));
    }

    #[test]
    fn test_empty_surface() {
        let output = SurfaceGenerator::new(&[], &[]).generate().unwrap();
        assert!(output.contains("declare const lib: {\n};"));
    }
}

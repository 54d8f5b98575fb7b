//! Signature transformation
//!
//! Derives the two faces of an alias from a validated descriptor: the
//! declaration the script author sees (context removed) and the forwarding
//! call the body makes (context restored through the ambient accessor).

use crate::validate::ValidDescriptor;
use crate::{CONTEXT_ACCESSOR, WIRE_NAMESPACE};

/// Declaration and call shapes for one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSignature {
    /// Exported alias name.
    pub name: String,
    /// Rendered type parameter list (`<T>`), empty when non-generic.
    pub type_params: String,
    /// Declaration parameters in order, context removed, variadic rendered
    /// with repeatable syntax.
    pub params: Vec<String>,
    /// Rendered return type.
    pub return_type: String,
    /// Whether the body returns the forwarded value.
    pub has_return: bool,
    /// Call target, e.g. `lib.cargo_build`.
    pub target: String,
    /// Call arguments: the context lookup followed by the parameter names.
    pub args: Vec<String>,
    /// Documentation carried from the descriptor.
    pub doc: Option<String>,
}

impl AliasSignature {
    /// Derive the signature from a validated descriptor.
    pub fn new(valid: &ValidDescriptor<'_>) -> Self {
        let params: Vec<String> = valid.visible_params().map(|p| p.to_declaration()).collect();

        // A variadic parameter is forwarded by name; the wire function
        // receives the already collected array.
        let mut args = vec![format!("{}()", CONTEXT_ACCESSOR)];
        args.extend(valid.visible_params().map(|p| p.name.clone()));

        Self {
            name: valid.name.clone(),
            type_params: valid.type_param_list(),
            params,
            return_type: valid.return_type.to_typescript(),
            has_return: valid.has_return(),
            target: format!("{}.{}", WIRE_NAMESPACE, valid.wire_name),
            args,
            doc: valid.doc.clone(),
        }
    }

    /// Rendered declaration head, e.g. `cargoMetadata<T>(manifestPath: string): T`.
    pub fn declaration(&self) -> String {
        format!(
            "{}{}({}): {}",
            self.name,
            self.type_params,
            self.params.join(", "),
            self.return_type
        )
    }

    /// Rendered forwarding call, e.g. `lib.cargo_metadata<T>(getContext(), manifestPath)`.
    ///
    /// Type parameters appear verbatim at both sites, so the declaration's
    /// generics and the call's generics always agree.
    pub fn call(&self) -> String {
        format!("{}{}({})", self.target, self.type_params, self.args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FunctionDescriptor, ParameterDescriptor, ScriptType};
    use crate::validate::validate;

    fn signature_of(descriptor: &FunctionDescriptor) -> AliasSignature {
        AliasSignature::new(&validate(descriptor).unwrap())
    }

    #[test]
    fn test_context_parameter_dropped() {
        let descriptor = FunctionDescriptor::from_wire_name("npm_install")
            .context_extension()
            .alias_tagged()
            .param(ParameterDescriptor::new(
                "settings",
                ScriptType::named("NpmInstallSettings"),
            ));

        let signature = signature_of(&descriptor);
        assert_eq!(
            signature.declaration(),
            "npmInstall(settings: NpmInstallSettings): void"
        );
        assert_eq!(
            signature.call(),
            "lib.npm_install(getContext(), settings)"
        );
    }

    #[test]
    fn test_zero_parameter_alias() {
        let descriptor = FunctionDescriptor::from_wire_name("cargo_version")
            .context_extension()
            .alias_tagged()
            .returns(ScriptType::string());

        let signature = signature_of(&descriptor);
        assert_eq!(signature.declaration(), "cargoVersion(): string");
        assert_eq!(signature.call(), "lib.cargo_version(getContext())");
        assert!(signature.has_return);
    }

    #[test]
    fn test_type_params_both_sites() {
        let descriptor = FunctionDescriptor::from_wire_name("cargo_metadata")
            .context_extension()
            .alias_tagged()
            .type_param("T")
            .param(ParameterDescriptor::new("manifestPath", ScriptType::string()))
            .returns(ScriptType::type_param("T"));

        let signature = signature_of(&descriptor);
        assert_eq!(
            signature.declaration(),
            "cargoMetadata<T>(manifestPath: string): T"
        );
        assert_eq!(
            signature.call(),
            "lib.cargo_metadata<T>(getContext(), manifestPath)"
        );
    }

    #[test]
    fn test_variadic_forwarding() {
        let descriptor = FunctionDescriptor::from_wire_name("npm_run")
            .context_extension()
            .alias_tagged()
            .param(ParameterDescriptor::new("script", ScriptType::string()))
            .param(ParameterDescriptor::new("args", ScriptType::string()).variadic());

        let signature = signature_of(&descriptor);
        assert_eq!(
            signature.declaration(),
            "npmRun(script: string, ...args: string[]): void"
        );
        // The identifier is not expanded at the call site.
        assert_eq!(
            signature.call(),
            "lib.npm_run(getContext(), script, args)"
        );
    }

    #[test]
    fn test_procedure_signature() {
        let descriptor = FunctionDescriptor::from_wire_name("cargo_build")
            .context_extension()
            .alias_tagged()
            .param(ParameterDescriptor::new(
                "settings",
                ScriptType::named("CargoBuildSettings"),
            ));

        let signature = signature_of(&descriptor);
        assert!(!signature.has_return);
        assert_eq!(signature.return_type, "void");
    }
}

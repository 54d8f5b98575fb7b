//! Alias eligibility validation
//!
//! A descriptor must pass validation before any code is generated from it.
//! Rules are checked in a fixed order and the first failure is reported,
//! so a descriptor that breaks several rules always reports the same one.

use crate::ir::{FunctionDescriptor, ScriptType};
use crate::{CONTEXT_ACCESSOR, WIRE_NAMESPACE};

/// Why a descriptor was rejected for alias generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The declaring container is not a module-level declaration.
    #[error("the container '{container}' of '{name}' is not a static declaration")]
    NotStaticContainer {
        /// Alias name.
        name: String,
        /// Container path from the descriptor.
        container: String,
    },

    /// The function does not extend the ambient context.
    #[error("the function '{name}' is not a context extension")]
    NotContextExtension {
        /// Alias name.
        name: String,
    },

    /// The function is not tagged as a method alias.
    #[error("the function '{name}' is not a method alias")]
    NotMarkedAsAlias {
        /// Alias name.
        name: String,
    },

    /// A parameter name would shadow a binding in the generated body.
    #[error("the parameter '{param}' of '{name}' shadows a generated binding")]
    ReservedParameterName {
        /// Alias name.
        name: String,
        /// Offending parameter name.
        param: String,
    },
}

/// A descriptor that passed validation.
///
/// Only [`validate`] constructs this type, so the signature and emission
/// stages can rely on every rule having been checked.
#[derive(Debug, Clone, Copy)]
pub struct ValidDescriptor<'a> {
    descriptor: &'a FunctionDescriptor,
}

impl<'a> ValidDescriptor<'a> {
    /// The underlying descriptor.
    pub fn descriptor(&self) -> &'a FunctionDescriptor {
        self.descriptor
    }
}

impl std::ops::Deref for ValidDescriptor<'_> {
    type Target = FunctionDescriptor;

    fn deref(&self) -> &Self::Target {
        self.descriptor
    }
}

/// Check whether a descriptor is eligible for alias generation.
///
/// The rules, in order:
/// 1. the container must be a static declaration,
/// 2. the function must take the ambient context as its first parameter,
/// 3. the function must be tagged as a method alias,
/// 4. no visible parameter may be named after the context accessor or the
///    wire namespace.
///
/// # Panics
///
/// Panics when the descriptor's shape contradicts its flags (context flag
/// without a leading context parameter, context in a later position, a
/// variadic parameter that is not last, or a type parameter used without
/// being declared). Such descriptors are bugs in the code that built them,
/// not rejectable input.
pub fn validate(descriptor: &FunctionDescriptor) -> Result<ValidDescriptor<'_>, ValidationError> {
    if !descriptor.container_is_static {
        return Err(ValidationError::NotStaticContainer {
            name: descriptor.name.clone(),
            container: descriptor.container.clone(),
        });
    }

    if !descriptor.is_context_extension {
        return Err(ValidationError::NotContextExtension {
            name: descriptor.name.clone(),
        });
    }

    if !descriptor.is_alias_tagged {
        return Err(ValidationError::NotMarkedAsAlias {
            name: descriptor.name.clone(),
        });
    }

    for param in descriptor.visible_params() {
        if param.name == CONTEXT_ACCESSOR || param.name == WIRE_NAMESPACE {
            return Err(ValidationError::ReservedParameterName {
                name: descriptor.name.clone(),
                param: param.name.clone(),
            });
        }
    }

    assert!(
        descriptor.params.first().is_some_and(|p| p.is_context()),
        "context extension '{}' must take the context as its first parameter",
        descriptor.name
    );
    assert!(
        descriptor.params.iter().skip(1).all(|p| !p.is_context()),
        "the context may only appear as the first parameter of '{}'",
        descriptor.name
    );
    let last = descriptor.params.len() - 1;
    assert!(
        descriptor
            .params
            .iter()
            .enumerate()
            .all(|(i, p)| !p.is_variadic || i == last),
        "the variadic parameter of '{}' must be last",
        descriptor.name
    );
    for param in &descriptor.params {
        assert_declared_type_params(&descriptor.name, &descriptor.type_params, &param.ty);
    }
    assert_declared_type_params(&descriptor.name, &descriptor.type_params, &descriptor.return_type);

    Ok(ValidDescriptor { descriptor })
}

/// A type parameter referenced anywhere in a signature must be declared on
/// the function.
fn assert_declared_type_params(name: &str, declared: &[String], ty: &ScriptType) {
    match ty {
        ScriptType::TypeParam(param) => assert!(
            declared.iter().any(|d| d == param),
            "the type parameter '{}' of '{}' is not declared",
            param,
            name
        ),
        ScriptType::Option(inner) | ScriptType::List(inner) => {
            assert_declared_type_params(name, declared, inner);
        }
        ScriptType::Map { key, value } => {
            assert_declared_type_params(name, declared, key);
            assert_declared_type_params(name, declared, value);
        }
        ScriptType::Named { params, .. } => {
            for param in params {
                assert_declared_type_params(name, declared, param);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ParameterDescriptor, ScriptType};

    fn eligible() -> FunctionDescriptor {
        FunctionDescriptor::from_wire_name("cargo_build")
            .in_container("tool_cargo::aliases")
            .context_extension()
            .alias_tagged()
            .param(ParameterDescriptor::new(
                "settings",
                ScriptType::named("CargoBuildSettings"),
            ))
    }

    #[test]
    fn test_eligible_descriptor() {
        let descriptor = eligible();
        let valid = validate(&descriptor).unwrap();
        assert_eq!(valid.descriptor().wire_name, "cargo_build");
    }

    #[test]
    fn test_not_static_container() {
        let descriptor = eligible().instance_container();
        assert_eq!(
            validate(&descriptor).unwrap_err(),
            ValidationError::NotStaticContainer {
                name: "cargoBuild".to_string(),
                container: "tool_cargo::aliases".to_string(),
            }
        );
    }

    #[test]
    fn test_not_context_extension() {
        let descriptor = FunctionDescriptor::from_wire_name("cargo_build")
            .alias_tagged()
            .param(ParameterDescriptor::new("path", ScriptType::string()));
        assert_eq!(
            validate(&descriptor).unwrap_err(),
            ValidationError::NotContextExtension {
                name: "cargoBuild".to_string(),
            }
        );
    }

    #[test]
    fn test_not_marked_as_alias() {
        let descriptor = FunctionDescriptor::from_wire_name("cargo_build").context_extension();
        assert_eq!(
            validate(&descriptor).unwrap_err(),
            ValidationError::NotMarkedAsAlias {
                name: "cargoBuild".to_string(),
            }
        );
    }

    #[test]
    fn test_reserved_context_accessor_name() {
        let descriptor = eligible().param(ParameterDescriptor::new(
            "getContext",
            ScriptType::string(),
        ));
        assert_eq!(
            validate(&descriptor).unwrap_err(),
            ValidationError::ReservedParameterName {
                name: "cargoBuild".to_string(),
                param: "getContext".to_string(),
            }
        );
    }

    #[test]
    fn test_reserved_wire_namespace_name() {
        let descriptor = eligible().param(ParameterDescriptor::new("lib", ScriptType::string()));
        assert!(matches!(
            validate(&descriptor).unwrap_err(),
            ValidationError::ReservedParameterName { ref param, .. } if param == "lib"
        ));
    }

    #[test]
    fn test_rule_order() {
        // Breaks every rule; the container rule must win.
        let descriptor = FunctionDescriptor::from_wire_name("cargo_build")
            .in_container("tool_cargo::Runner")
            .instance_container();
        assert!(matches!(
            validate(&descriptor).unwrap_err(),
            ValidationError::NotStaticContainer { .. }
        ));
    }

    #[test]
    #[should_panic(expected = "must take the context as its first parameter")]
    fn test_panics_without_context_parameter() {
        let mut descriptor = FunctionDescriptor::from_wire_name("cargo_build").alias_tagged();
        descriptor.is_context_extension = true;
        let _ = validate(&descriptor);
    }

    #[test]
    #[should_panic(expected = "must be last")]
    fn test_panics_on_misplaced_variadic() {
        let descriptor = eligible()
            .param(ParameterDescriptor::new("scripts", ScriptType::string()).variadic())
            .param(ParameterDescriptor::new("after", ScriptType::string()));
        let _ = validate(&descriptor);
    }

    #[test]
    #[should_panic(expected = "is not declared")]
    fn test_panics_on_dangling_type_param() {
        let descriptor = eligible().returns(ScriptType::list(ScriptType::type_param("T")));
        let _ = validate(&descriptor);
    }

    #[test]
    fn test_declared_type_params() {
        let descriptor = FunctionDescriptor::from_wire_name("cargo_metadata")
            .context_extension()
            .alias_tagged()
            .type_param("T")
            .param(ParameterDescriptor::new("manifestPath", ScriptType::string()))
            .returns(ScriptType::type_param("T"));
        assert!(validate(&descriptor).is_ok());
    }
}

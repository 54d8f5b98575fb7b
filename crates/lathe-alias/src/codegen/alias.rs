//! Alias declaration emitter
//!
//! Renders the forwarding function for a descriptor: validation first,
//! signature transformation second, then a fixed-shape declaration whose
//! body is a single forwarding statement.

use crate::ir::FunctionDescriptor;
use crate::signature::AliasSignature;
use crate::validate::{validate, ValidationError};

/// Generate the forwarding declaration for one descriptor.
///
/// Rejection produces no partial output; the same descriptor always
/// produces the same text.
pub fn generate_alias(descriptor: &FunctionDescriptor) -> Result<String, ValidationError> {
    let valid = validate(descriptor)?;
    Ok(emit(&AliasSignature::new(&valid)))
}

/// Generate declarations for a batch of descriptors.
///
/// Outcomes are independent: a rejected descriptor does not affect the
/// others, and results come back in input order.
pub fn generate_all(descriptors: &[FunctionDescriptor]) -> Vec<Result<String, ValidationError>> {
    descriptors.iter().map(generate_alias).collect()
}

/// Render the forwarding function for a derived signature.
pub(crate) fn emit(signature: &AliasSignature) -> String {
    let mut output = String::new();

    if let Some(doc) = &signature.doc {
        output.push_str("/**\n");
        for line in doc.lines() {
            output.push_str(&format!(" * {}\n", line));
        }
        output.push_str(" */\n");
    }

    output.push_str(&format!("export function {} {{\n", signature.declaration()));

    // Procedure-shaped aliases forward without returning.
    if signature.has_return {
        output.push_str(&format!("  return {};\n", signature.call()));
    } else {
        output.push_str(&format!("  {};\n", signature.call()));
    }

    output.push_str("}\n");
    output
}

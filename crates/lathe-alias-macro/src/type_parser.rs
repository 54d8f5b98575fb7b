//! Type parser for converting Rust types to ScriptType token streams
//!
//! This module provides strict type parsing for the alias macros.
//! It returns errors with source location for unparseable types, so no
//! accidental `unknown` appears in the generated script surface.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, GenericArgument, PathArguments, Type};

/// Parse a Rust type into a ScriptType token stream.
///
/// `type_params` carries the generic parameter names of the enclosing
/// declaration; a bare path matching one of them becomes a preserved
/// type parameter instead of a named reference.
///
/// # Errors
/// Returns a syn::Error with source location if a type cannot be mapped.
///
/// # Supported Types
/// - Primitives: integer types, f32/f64, bool, String, &str, char, ()
/// - Paths: PathBuf and Path surface as strings
/// - Containers: Option<T>, Vec<T>, slices, arrays
/// - Maps: HashMap<K, V>, BTreeMap<K, V>
/// - Sets: HashSet<T>, BTreeSet<T> (surface as arrays)
/// - Result<T, E>: surfaces as T, errors are thrown script-side
/// - The ambient context: &BuildContext
/// - serde_json::Value: surfaces as unknown
/// - Custom types: treated as named interface references
pub fn rust_type_to_script_type(ty: &Type, type_params: &[String]) -> syn::Result<TokenStream> {
    match ty {
        Type::Path(type_path) => parse_path_type(type_path, type_params),
        Type::Reference(type_ref) => {
            // References are transparent on the script side
            rust_type_to_script_type(&type_ref.elem, type_params)
        }
        Type::Tuple(type_tuple) => {
            if type_tuple.elems.is_empty() {
                Ok(
                    quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::Unit) },
                )
            } else {
                Err(Error::new_spanned(
                    type_tuple,
                    "lathe-alias: Tuple types have no script equivalent. \
                     Use a settings struct instead.",
                ))
            }
        }
        Type::Slice(type_slice) => {
            let inner = rust_type_to_script_type(&type_slice.elem, type_params)?;
            Ok(quote! { lathe_alias::ScriptType::List(Box::new(#inner)) })
        }
        Type::Array(type_array) => {
            let inner = rust_type_to_script_type(&type_array.elem, type_params)?;
            Ok(quote! { lathe_alias::ScriptType::List(Box::new(#inner)) })
        }
        Type::Paren(type_paren) => rust_type_to_script_type(&type_paren.elem, type_params),
        Type::Group(type_group) => rust_type_to_script_type(&type_group.elem, type_params),
        Type::BareFn(bare_fn) => Err(Error::new_spanned(
            bare_fn,
            "lathe-alias: Bare function types are not supported. \
             Consider wrapping in a settings struct or using a different type.",
        )),
        Type::ImplTrait(impl_trait) => Err(Error::new_spanned(
            impl_trait,
            "lathe-alias: `impl Trait` types are not supported. \
             Use concrete types instead.",
        )),
        Type::TraitObject(trait_obj) => Err(Error::new_spanned(
            trait_obj,
            "lathe-alias: Trait object types (`dyn Trait`) are not supported. \
             Use concrete types instead.",
        )),
        Type::Infer(infer) => Err(Error::new_spanned(
            infer,
            "lathe-alias: Inferred types (`_`) are not supported. \
             Please specify the concrete type.",
        )),
        Type::Ptr(type_ptr) => Err(Error::new_spanned(
            type_ptr,
            "lathe-alias: Raw pointer types are not supported.",
        )),
        Type::Macro(type_macro) => Err(Error::new_spanned(
            type_macro,
            "lathe-alias: Macro types are not supported. \
             Expand the macro or use a concrete type.",
        )),
        _ => Err(Error::new_spanned(
            ty,
            "lathe-alias: Unsupported type. \
             This type cannot be mapped to the script surface. \
             Please use a supported type or wrap it in a settings struct.",
        )),
    }
}

/// Parse a Type::Path into ScriptType tokens
fn parse_path_type(type_path: &syn::TypePath, type_params: &[String]) -> syn::Result<TokenStream> {
    let segments: Vec<_> = type_path.path.segments.iter().collect();

    if let Some(last_seg) = segments.last() {
        let ident = last_seg.ident.to_string();

        // The ambient context
        if ident == "BuildContext" {
            return Ok(quote! { lathe_alias::ScriptType::Context });
        }

        // A generic parameter of the enclosing declaration
        if segments.len() == 1
            && last_seg.arguments.is_empty()
            && type_params.iter().any(|p| p == &ident)
        {
            return Ok(quote! { lathe_alias::ScriptType::TypeParam(#ident.to_string()) });
        }

        // Handle primitive types
        if let Some(primitive) = parse_primitive(&ident) {
            return Ok(primitive);
        }

        // Handle generic containers
        if let PathArguments::AngleBracketed(args) = &last_seg.arguments {
            // Result<T, E> surfaces as T; only the ok type is parsed and the
            // error type never constrains the script surface
            if ident == "Result" {
                if let Some(GenericArgument::Type(ok_ty)) = args.args.first() {
                    return rust_type_to_script_type(ok_ty, type_params);
                }
            }

            let inner_types: Vec<_> = args
                .args
                .iter()
                .filter_map(|arg| {
                    if let GenericArgument::Type(inner_ty) = arg {
                        Some(rust_type_to_script_type(inner_ty, type_params))
                    } else {
                        None
                    }
                })
                .collect::<syn::Result<Vec<_>>>()?;

            if let Some(container) = parse_generic_type(&ident, &inner_types) {
                return Ok(container);
            }
        }

        // Handle serde_json::Value
        if ident == "Value" {
            let path_str = segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect::<Vec<_>>()
                .join("::");
            if path_str.contains("serde_json") || path_str == "Value" {
                return Ok(quote! { lathe_alias::ScriptType::Unknown });
            }
        }

        // Default: treat as a named interface reference
        return Ok(quote! {
            lathe_alias::ScriptType::Named {
                name: #ident.to_string(),
                params: Vec::new(),
            }
        });
    }

    Err(Error::new_spanned(
        type_path,
        "lathe-alias: Empty type path encountered. This is likely a bug.",
    ))
}

/// Parse a primitive type name into ScriptType tokens
fn parse_primitive(ident: &str) -> Option<TokenStream> {
    let tokens = match ident {
        "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64" | "isize" => {
            quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::Int) }
        }
        "f32" | "f64" => {
            quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::Float) }
        }
        "bool" => {
            quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::Bool) }
        }
        "String" | "str" | "char" => {
            quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::String) }
        }
        // Paths cross the boundary as plain strings
        "PathBuf" | "Path" => {
            quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::String) }
        }
        _ => return None,
    };
    Some(tokens)
}

/// Parse a generic container with its inner types
fn parse_generic_type(ident: &str, inner_types: &[TokenStream]) -> Option<TokenStream> {
    match ident {
        "Option" => {
            let inner = inner_types.first()?;
            Some(quote! { lathe_alias::ScriptType::Option(Box::new(#inner)) })
        }
        "Vec" | "HashSet" | "BTreeSet" => {
            let inner = inner_types.first()?;
            Some(quote! { lathe_alias::ScriptType::List(Box::new(#inner)) })
        }
        "HashMap" | "BTreeMap" => {
            if inner_types.len() >= 2 {
                let key_type = &inner_types[0];
                let val_type = &inner_types[1];
                Some(quote! {
                    lathe_alias::ScriptType::Map {
                        key: Box::new(#key_type),
                        value: Box::new(#val_type),
                    }
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

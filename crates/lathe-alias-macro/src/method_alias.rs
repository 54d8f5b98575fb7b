//! Implementation of the #[method_alias] macro

use crate::type_parser::rust_type_to_script_type;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse2, Attribute, Error, FnArg, ItemFn, Pat, ReturnType, Type};

/// Parse method_alias attributes
struct MethodAliasAttrs {
    name: Option<String>,
}

impl MethodAliasAttrs {
    fn parse(attr: TokenStream) -> Self {
        let mut attrs = MethodAliasAttrs { name: None };

        if attr.is_empty() {
            return attrs;
        }

        // Parse attributes like: name = "customName"
        let attr_str = attr.to_string();
        for part in attr_str.split(',') {
            let part = part.trim();
            if part.starts_with("name") {
                if let Some(eq_pos) = part.find('=') {
                    let name = part[eq_pos + 1..].trim().trim_matches('"');
                    attrs.name = Some(name.to_string());
                }
            }
        }

        attrs
    }
}

/// Convert snake_case to camelCase
pub(crate) fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Collect doc comment lines from attributes
pub(crate) fn extract_doc(attrs: &[Attribute]) -> Option<String> {
    let mut lines = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let syn::Meta::NameValue(nv) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &nv.value {
                    if let syn::Lit::Str(s) = &expr_lit.lit {
                        lines.push(s.value().trim().to_string());
                    }
                }
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Check whether a type is the ambient build context
fn is_context_type(ty: &Type) -> bool {
    match ty {
        Type::Reference(type_ref) => is_context_type(&type_ref.elem),
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|s| s.ident == "BuildContext")
            .unwrap_or(false),
        _ => false,
    }
}

/// Extract the element type of a #[variadic] parameter (Vec<T> or slice)
fn variadic_element_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Reference(type_ref) => variadic_element_type(&type_ref.elem),
        Type::Slice(type_slice) => Some(&type_slice.elem),
        Type::Path(type_path) => {
            let last = type_path.path.segments.last()?;
            if last.ident != "Vec" {
                return None;
            }
            if let syn::PathArguments::AngleBracketed(args) = &last.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
            None
        }
        _ => None,
    }
}

pub fn method_alias_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input: ItemFn = match parse2(item) {
        Ok(input) => input,
        Err(e) => return e.to_compile_error(),
    };

    let attrs = MethodAliasAttrs::parse(attr);

    let fn_name = &input.sig.ident;
    let fn_name_str = fn_name.to_string();

    // Determine the script name
    let alias_name = attrs.name.unwrap_or_else(|| to_camel_case(&fn_name_str));

    // Generic parameters carry over verbatim
    let type_params: Vec<String> = input
        .sig
        .generics
        .type_params()
        .map(|p| p.ident.to_string())
        .collect();

    // A receiver means the function lives on an instance, which the
    // validator rejects as a non-static container
    let container_is_static = !input
        .sig
        .inputs
        .iter()
        .any(|arg| matches!(arg, FnArg::Receiver(_)));

    // Build parameter descriptors, stripping #[variadic] markers as we go
    let total = input.sig.inputs.len();
    let mut param_tokens = Vec::new();
    let mut is_context_extension = false;

    for (index, arg) in input.sig.inputs.iter_mut().enumerate() {
        let pat_type = match arg {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(_) => continue,
        };

        let rust_name = match &*pat_type.pat {
            Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
            _ => continue,
        };

        let is_variadic = pat_type.attrs.iter().any(|a| a.path().is_ident("variadic"));
        pat_type.attrs.retain(|a| !a.path().is_ident("variadic"));

        if is_context_type(&pat_type.ty) {
            if index != 0 {
                return Error::new_spanned(
                    pat_type,
                    "lathe-alias: the build context must be the first parameter",
                )
                .to_compile_error();
            }
            is_context_extension = true;
            param_tokens.push(quote! {
                lathe_alias::ParameterDescriptor {
                    name: "context".to_string(),
                    ty: lathe_alias::ScriptType::Context,
                    is_variadic: false,
                    doc: None,
                }
            });
            continue;
        }

        let param_name = to_camel_case(&rust_name);

        let type_tokens = if is_variadic {
            if index + 1 != total {
                return Error::new_spanned(
                    pat_type,
                    "lathe-alias: the #[variadic] parameter must be last",
                )
                .to_compile_error();
            }
            let element = match variadic_element_type(&pat_type.ty) {
                Some(element) => element,
                None => {
                    return Error::new_spanned(
                        &pat_type.ty,
                        "lathe-alias: a #[variadic] parameter must be a Vec<T> or slice",
                    )
                    .to_compile_error();
                }
            };
            match rust_type_to_script_type(element, &type_params) {
                Ok(tokens) => tokens,
                Err(e) => return e.to_compile_error(),
            }
        } else {
            match rust_type_to_script_type(&pat_type.ty, &type_params) {
                Ok(tokens) => tokens,
                Err(e) => return e.to_compile_error(),
            }
        };

        param_tokens.push(quote! {
            lathe_alias::ParameterDescriptor {
                name: #param_name.to_string(),
                ty: #type_tokens,
                is_variadic: #is_variadic,
                doc: None,
            }
        });
    }

    // Return type; Result<T, E> surfaces as T
    let return_tokens = match &input.sig.output {
        ReturnType::Default => {
            quote! { lathe_alias::ScriptType::Primitive(lathe_alias::ScriptPrimitive::Unit) }
        }
        ReturnType::Type(_, ty) => match rust_type_to_script_type(ty, &type_params) {
            Ok(tokens) => tokens,
            Err(e) => return e.to_compile_error(),
        },
    };

    // Documentation travels into the generated surface
    let doc_tokens = match extract_doc(&input.attrs) {
        Some(doc) => quote! { Some(#doc.to_string()) },
        None => quote! { None },
    };

    let type_param_tokens: Vec<_> = type_params
        .iter()
        .map(|name| quote! { #name.to_string() })
        .collect();

    // Generate the descriptor function and registration
    let metadata_fn_name = format_ident!("__{}_alias_descriptor", fn_name);
    let registration_name = format_ident!("__{}_ALIAS", fn_name_str.to_uppercase());

    let expanded = quote! {
        #input

        #[doc(hidden)]
        fn #metadata_fn_name() -> lathe_alias::FunctionDescriptor {
            lathe_alias::FunctionDescriptor {
                name: #alias_name.to_string(),
                wire_name: #fn_name_str.to_string(),
                container: module_path!().to_string(),
                container_is_static: #container_is_static,
                is_context_extension: #is_context_extension,
                is_alias_tagged: true,
                type_params: vec![#(#type_param_tokens),*],
                params: vec![#(#param_tokens),*],
                return_type: #return_tokens,
                doc: #doc_tokens,
            }
        }

        lathe_alias::register_alias!(#registration_name, #metadata_fn_name());
    };

    expanded
}

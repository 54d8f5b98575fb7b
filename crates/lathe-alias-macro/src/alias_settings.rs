//! Implementation of the #[alias_settings] macro

use crate::method_alias::{extract_doc, to_camel_case};
use crate::type_parser::rust_type_to_script_type;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse2, Fields, ItemStruct, Type};

/// Parse alias_settings attributes
struct AliasSettingsAttrs {
    name: Option<String>,
}

impl AliasSettingsAttrs {
    fn parse(attr: TokenStream) -> Self {
        let mut attrs = AliasSettingsAttrs { name: None };

        if attr.is_empty() {
            return attrs;
        }

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

/// Check whether a field type is Option<T>
fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|s| s.ident == "Option")
            .unwrap_or(false),
        _ => false,
    }
}

pub fn alias_settings_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input: ItemStruct = match parse2(item) {
        Ok(input) => input,
        Err(e) => return e.to_compile_error(),
    };

    let attrs = AliasSettingsAttrs::parse(attr);

    let struct_name = &input.ident;
    let struct_name_str = struct_name.to_string();

    // Interface name defaults to the struct name
    let interface_name = attrs.name.unwrap_or_else(|| struct_name_str.clone());

    let type_params: Vec<String> = input
        .generics
        .type_params()
        .map(|p| p.ident.to_string())
        .collect();

    // Extract fields
    let field_tokens: Vec<_> = match &input.fields {
        Fields::Named(fields) => {
            let mut tokens = Vec::new();
            for f in &fields.named {
                let name = match f.ident.as_ref() {
                    Some(name) => name.to_string(),
                    None => continue,
                };
                let field_name = to_camel_case(&name);
                let is_optional = is_option_type(&f.ty);

                let type_tokens = match rust_type_to_script_type(&f.ty, &type_params) {
                    Ok(tokens) => tokens,
                    Err(e) => return e.to_compile_error(),
                };

                let doc_tokens = match extract_doc(&f.attrs) {
                    Some(doc) => quote! { Some(#doc.to_string()) },
                    None => quote! { None },
                };

                tokens.push(quote! {
                    lathe_alias::FieldDescriptor {
                        name: #field_name.to_string(),
                        ty: #type_tokens,
                        optional: #is_optional,
                        doc: #doc_tokens,
                    }
                });
            }
            tokens
        }
        _ => Vec::new(),
    };

    let doc_tokens = match extract_doc(&input.attrs) {
        Some(doc) => quote! { Some(#doc.to_string()) },
        None => quote! { None },
    };

    let type_param_tokens: Vec<_> = type_params
        .iter()
        .map(|name| quote! { #name.to_string() })
        .collect();

    // Generate the descriptor function and registration
    let metadata_fn_name = format_ident!("__{}_settings_descriptor", struct_name);
    let registration_name = format_ident!("__{}_SETTINGS", struct_name_str.to_uppercase());

    let expanded = quote! {
        #input

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #metadata_fn_name() -> lathe_alias::StructDescriptor {
            lathe_alias::StructDescriptor {
                name: #interface_name.to_string(),
                fields: vec![#(#field_tokens),*],
                type_params: vec![#(#type_param_tokens),*],
                doc: #doc_tokens,
            }
        }

        lathe_alias::register_settings!(#registration_name, #metadata_fn_name());
    };

    expanded
}

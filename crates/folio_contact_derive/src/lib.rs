use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Generates one zero-sized lens per named field plus a `<Model>Fields`
/// accessor carrying the field keys in declaration order.
#[proc_macro_derive(FormModel)]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "FormModel can only be derived for non-generic structs",
        ));
    }

    let model_ident = input.ident;
    let fields_ident = format_ident!("{model_ident}Fields");

    let named = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "FormModel needs a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                Span::call_site(),
                "FormModel can only be derived for structs",
            ));
        }
    };

    let root = crate_root();
    let mut lenses = Vec::new();
    let mut accessors = Vec::new();
    let mut keys = Vec::new();

    for field in named {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_ty = field.ty;
        let key = field_ident.to_string();
        let lens_ident = format_ident!("{model_ident}{}Lens", pascal_case(&key));

        lenses.push(quote! {
            #[derive(Clone, Copy, Debug, Default)]
            pub struct #lens_ident;

            impl #root::form::FieldLens<#model_ident> for #lens_ident {
                type Value = #field_ty;

                fn key(self) -> #root::form::FieldKey {
                    #root::form::FieldKey::new(#key)
                }

                fn get<'a>(self, model: &'a #model_ident) -> &'a Self::Value {
                    &model.#field_ident
                }

                fn set(self, model: &mut #model_ident, value: Self::Value) {
                    model.#field_ident = value;
                }
            }
        });

        accessors.push(quote! {
            pub const fn #field_ident(&self) -> #lens_ident {
                #lens_ident
            }
        });

        keys.push(quote!(#root::form::FieldKey::new(#key)));
    }

    let key_count = keys.len();

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_ident;

        impl #fields_ident {
            pub const KEYS: [#root::form::FieldKey; #key_count] = [#(#keys),*];

            #(#accessors)*
        }

        impl #root::form::FormModel for #model_ident {
            type Fields = #fields_ident;

            fn fields() -> Self::Fields {
                #fields_ident
            }

            fn field_keys() -> &'static [#root::form::FieldKey] {
                &#fields_ident::KEYS
            }
        }

        #(#lenses)*
    })
}

fn crate_root() -> TokenStream2 {
    match crate_name("folio_contact") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::folio_contact),
    }
}

fn pascal_case(input: &str) -> String {
    input
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

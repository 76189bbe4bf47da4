use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Expr, ExprLit, ExprUnary, Index, Lit, UnOp};

/// Derive macro for default filling.
///
/// Implements `structfill::Fill` for a struct: fields are walked in
/// declaration order, scalar fields with a `default` are filled when empty,
/// and nested structures are recursed into.
///
/// # Example
///
/// ```ignore
/// #[derive(Fill, Default)]
/// pub struct Limits {
///     #[fill(default = "true")]
///     pub enabled: bool,
///
///     #[fill(default = 33)]
///     pub count: u32,
///
///     #[fill(skip)]
///     pub callback: Option<fn()>,
/// }
/// ```
///
/// Every field that is not skipped must implement `Fill`.
#[proc_macro_derive(Fill, attributes(fill))]
pub fn derive_fill(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Parsed `#[fill(...)]` options of one field.
#[derive(Default)]
struct FieldAttrs {
    default: Option<String>,
    skip: bool,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Fill can only be derived for structs",
            ))
        }
    };

    let mut walk_tokens = Vec::new();
    let mut zero_tokens = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        let (access, field_name) = match &field.ident {
            Some(ident) => (quote! { #ident }, ident.unraw().to_string()),
            None => {
                let index = Index::from(index);
                (quote! { #index }, index.index.to_string())
            }
        };
        let tag = attrs.default.unwrap_or_default();

        walk_tokens.push(quote! {
            walker.field(#field_name, &mut self.#access, #tag);
        });
        zero_tokens.push(quote! {
            ::structfill::Fill::is_zero(&self.#access)
        });
    }

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::structfill::Fill));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // A struct with no walked fields has nothing to fill and is always zero.
    let walk_param = if walk_tokens.is_empty() {
        quote! { _walker }
    } else {
        quote! { walker }
    };

    let expanded = quote! {
        impl #impl_generics ::structfill::Fill for #name #ty_generics #where_clause {
            fn kind(&self) -> ::structfill::Kind {
                ::structfill::Kind::Struct
            }

            fn is_zero(&self) -> bool {
                true #(&& #zero_tokens)*
            }

            fn walk<'__a>(&'__a mut self, #walk_param: &mut ::structfill::Walker<'__a, '_>) {
                #(#walk_tokens)*
            }
        }
    };

    Ok(expanded)
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs, syn::Error> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("fill") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                if attrs.default.is_some() {
                    return Err(meta.error("duplicate `default`"));
                }
                let expr: Expr = meta.value()?.parse()?;
                attrs.default = Some(default_text(&expr)?);
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error("unknown fill option (expected `default` or `skip`)"));
            }
            Ok(())
        })?;
    }

    if attrs.skip && attrs.default.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "`default` has no effect on a `skip` field",
        ));
    }

    Ok(attrs)
}

/// Source text of a default: strings verbatim, numbers (optionally negated)
/// and booleans as written.
fn default_text(expr: &Expr) -> Result<String, syn::Error> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => literal_text(lit),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit {
                lit: lit @ (Lit::Int(_) | Lit::Float(_)),
                ..
            }) => Ok(format!("-{}", literal_text(lit)?)),
            _ => Err(syn::Error::new_spanned(expr, "expected a numeric literal after `-`")),
        },
        _ => Err(syn::Error::new_spanned(
            expr,
            "expected a string, integer, float or boolean literal",
        )),
    }
}

fn literal_text(lit: &Lit) -> Result<String, syn::Error> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => {
            if !i.suffix().is_empty() {
                return Err(syn::Error::new_spanned(
                    i,
                    "remove the type suffix, the field type decides",
                ));
            }
            Ok(i.base10_digits().to_string())
        }
        Lit::Float(f) => {
            if !f.suffix().is_empty() {
                return Err(syn::Error::new_spanned(
                    f,
                    "remove the type suffix, the field type decides",
                ));
            }
            Ok(f.base10_digits().to_string())
        }
        Lit::Bool(b) => Ok(b.value.to_string()),
        other => Err(syn::Error::new_spanned(
            other,
            "expected a string, integer, float or boolean literal",
        )),
    }
}

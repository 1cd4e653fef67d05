use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Field, Ident, Lit, LitStr,
    Meta, Path, Token, Type,
};

/// How a field takes part in the generated `Record` impl, decided by the
/// outer wrapper of its declared type and the `flatten` attribute.
enum FieldKind {
    /// `Data` or `Coord`: carries an array value, settable by name.
    Array,
    /// `Coordof` or `Dataof`: the nested record provides dims and dtype.
    Nested,
    /// `Attr` or `Name`.
    Meta,
    /// `#[dimrec(flatten)]`: the base record's fields are spliced in place.
    Flatten,
    /// Any other type: kept on the record, ignored by assembly.
    PassThrough,
}

struct RecordField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    /// The name contributed to the registry, after `rename`.
    name: String,
    kind: FieldKind,
    dtype: Option<LitStr>,
}

struct FieldAttrs {
    flatten: bool,
    dtype: Option<LitStr>,
    rename: Option<LitStr>,
}

pub fn impl_record(ast: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let fields = named_fields(ast)?;
    let factory = parse_struct_attrs(&ast.attrs)?;

    let mut parsed = Vec::with_capacity(fields.len());
    for field in fields {
        parsed.push(parse_field(field)?);
    }

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let spec_stmts = parsed.iter().map(spec_stmt);
    let bind_stmts = parsed.iter().map(bind_stmt);
    let set_array_body = set_array_body(&parsed);
    let factory_method = factory_method(&parsed, factory);

    Ok(quote! {
        impl #impl_generics ::dimrec::Record for #name #ty_generics #where_clause {
            fn raw_specs() -> ::dimrec::Result<::std::vec::Vec<::dimrec::FieldSpec>> {
                let mut specs = ::std::vec::Vec::new();
                #(#spec_stmts)*
                Ok(specs)
            }

            fn bound_values(
                &self,
            ) -> ::dimrec::Result<::std::vec::Vec<(&'static str, ::dimrec::BoundValue)>> {
                let mut values = ::std::vec::Vec::new();
                #(#bind_stmts)*
                Ok(values)
            }

            fn set_array(&mut self, name: &str, value: ::dimrec::ArrayInput) -> bool {
                #set_array_body
            }

            #factory_method
        }
    })
}

fn named_fields(ast: &syn::DeriveInput) -> syn::Result<&Punctuated<Field, Token![,]>> {
    let fields = match &ast.data {
        syn::Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new(
                ast.span(),
                "Record can only be derived for structs.",
            ));
        }
    };

    match fields {
        syn::Fields::Named(named) => Ok(&named.named),
        _ => Err(syn::Error::new(
            ast.span(),
            "Record can only be derived for structs with named fields.",
        )),
    }
}

fn parse_field(field: &Field) -> syn::Result<RecordField<'_>> {
    let attrs = parse_field_attrs(&field.attrs)?;
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

    let kind = if attrs.flatten {
        FieldKind::Flatten
    } else {
        classify(&field.ty)
    };

    if attrs.dtype.is_some() && !matches!(kind, FieldKind::Array) {
        return Err(syn::Error::new(
            field.span(),
            "#[dimrec(dtype = \"…\")] is only supported on Data and Coord fields.",
        ));
    }
    if attrs.flatten && !matches!(classify(&field.ty), FieldKind::PassThrough) {
        return Err(syn::Error::new(
            field.span(),
            "#[dimrec(flatten)] cannot be combined with a schema wrapper type.",
        ));
    }

    let name = match &attrs.rename {
        Some(lit) => lit.value(),
        None => ident.to_string(),
    };

    Ok(RecordField {
        ident,
        ty: &field.ty,
        name,
        kind,
        dtype: attrs.dtype,
    })
}

fn classify(ty: &Type) -> FieldKind {
    let Type::Path(path) = ty else {
        return FieldKind::PassThrough;
    };
    let Some(segment) = path.path.segments.last() else {
        return FieldKind::PassThrough;
    };

    match segment.ident.to_string().as_str() {
        "Data" | "Coord" => FieldKind::Array,
        "Coordof" | "Dataof" => FieldKind::Nested,
        "Attr" | "Name" => FieldKind::Meta,
        _ => FieldKind::PassThrough,
    }
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs {
        flatten: false,
        dtype: None,
        rename: None,
    };

    for attr in attrs {
        if !attr.path().is_ident("dimrec") {
            continue;
        }

        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match &meta {
                Meta::Path(path) if path.is_ident("flatten") => parsed.flatten = true,
                Meta::NameValue(nv) if nv.path.is_ident("dtype") => {
                    parsed.dtype = Some(str_value(&nv.value)?)
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    parsed.rename = Some(str_value(&nv.value)?)
                }
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "unsupported dimrec attribute, expected `flatten`, `dtype = \"…\"` or `rename = \"…\"`.",
                    ));
                }
            }
        }
    }

    Ok(parsed)
}

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<Option<Path>> {
    let mut factory = None;

    for attr in attrs {
        if !attr.path().is_ident("dimrec") {
            continue;
        }

        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("factory") => match &nv.value {
                    Expr::Path(path) => factory = Some(path.path.clone()),
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "expected a type path, as in #[dimrec(factory = MyFactory)].",
                        ));
                    }
                },
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "unsupported dimrec attribute, expected `factory = MyFactory`.",
                    ));
                }
            }
        }
    }

    Ok(factory)
}

fn str_value(value: &Expr) -> syn::Result<LitStr> {
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit.clone()),
        other => Err(syn::Error::new(other.span(), "expected a string literal.")),
    }
}

fn spec_stmt(field: &RecordField<'_>) -> TokenStream {
    let ty = field.ty;
    let name = &field.name;

    match field.kind {
        FieldKind::Flatten => quote! {
            specs.extend(<#ty as ::dimrec::Record>::raw_specs()?);
        },
        FieldKind::PassThrough => quote! {
            specs.push(::dimrec::FieldSpec::pass_through(#name));
        },
        _ => match &field.dtype {
            Some(lit) => quote! {
                specs.push(
                    <#ty as ::dimrec::FieldHint>::spec(#name)?
                        .with_dtype(::dimrec::DType::parse(#lit)?),
                );
            },
            None => quote! {
                specs.push(<#ty as ::dimrec::FieldHint>::spec(#name)?);
            },
        },
    }
}

fn bind_stmt(field: &RecordField<'_>) -> TokenStream {
    let ident = field.ident;
    let ty = field.ty;
    let name = &field.name;

    match field.kind {
        FieldKind::Flatten => quote! {
            values.extend(<#ty as ::dimrec::Record>::bound_values(&self.#ident)?);
        },
        FieldKind::PassThrough => quote! {
            values.push((#name, ::dimrec::BoundValue::Skip));
        },
        _ => quote! {
            values.push((#name, ::dimrec::FieldHint::bind(&self.#ident)?));
        },
    }
}

fn set_array_body(fields: &[RecordField<'_>]) -> TokenStream {
    let arms = fields
        .iter()
        .filter(|field| matches!(field.kind, FieldKind::Array))
        .map(|field| {
            let ident = field.ident;
            let name = &field.name;
            quote! {
                #name => {
                    self.#ident.value = value;
                    true
                }
            }
        });

    let fallbacks = fields
        .iter()
        .filter(|field| matches!(field.kind, FieldKind::Flatten))
        .map(|field| {
            let ident = field.ident;
            let ty = field.ty;
            quote! {
                if <#ty as ::dimrec::Record>::set_array(&mut self.#ident, name, value.clone()) {
                    return true;
                }
            }
        });

    quote! {
        match name {
            #(#arms)*
            _ => {
                #(#fallbacks)*
                false
            }
        }
    }
}

/// Resolves the construction factory most-derived-first: an explicit
/// attribute wins, then the first flattened base, then the trait default.
fn factory_method(fields: &[RecordField<'_>], factory: Option<Path>) -> TokenStream {
    if let Some(path) = factory {
        return quote! {
            fn factory() -> &'static dyn ::dimrec::ContainerFactory {
                static FACTORY: ::std::sync::OnceLock<#path> = ::std::sync::OnceLock::new();
                FACTORY.get_or_init(<#path as ::std::default::Default>::default)
            }
        };
    }

    let first_base = fields
        .iter()
        .find(|field| matches!(field.kind, FieldKind::Flatten));
    match first_base {
        Some(field) => {
            let ty = field.ty;
            quote! {
                fn factory() -> &'static dyn ::dimrec::ContainerFactory {
                    <#ty as ::dimrec::Record>::factory()
                }
            }
        }
        None => quote! {},
    }
}

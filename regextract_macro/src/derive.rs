use std::collections::HashMap;

use convert_case::Casing;
use syn::ext::IdentExt;

use crate::*;

/// Every type parameter has to be extractable itself. Lifetimes are rejected, because extracted
/// values own their data.
fn add_bounds(mut generics: syn::Generics) -> Result<syn::Generics> {
    if let Some(lifetime) = generics.lifetimes().next() {
        let msg = "`Extract` cannot be derived for types with lifetimes, since extracted values own their data";
        return err_spanned(lifetime, msg);
    }
    let params: Vec<syn::Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause
            .predicates
            .push(syn::parse_quote!(#param: ::regextract::Extract));
    }
    Ok(generics)
}

fn construct_signature() -> TokenStream {
    quote! {
        fn construct(
            node: &::regextract::PlanNode,
            cx: &::regextract::Execution<'_>,
            span: ::regextract::Span,
        ) -> ::std::result::Result<Self, ::regextract::ExtractError>
    }
}

struct Field {
    member: syn::Member,
    /// Name of the group bound to the field
    name: String,
    ty: syn::Type,
    attr: FieldAttributes,
}

impl Field {
    /// The value of the field when it is not bound to a group
    fn unbound(&self) -> TokenStream {
        match &self.attr.default {
            Some(default) => default.clone(),
            None => quote! { fields.absent()? },
        }
    }
    /// The value of the field in `Extract::absent`
    fn absent(&self) -> TokenStream {
        let ty = &self.ty;
        match &self.attr.default {
            Some(default) => default.clone(),
            None => quote! { <#ty as ::regextract::Extract>::absent()? },
        }
    }
}

fn parse_fields(fields: syn::Fields) -> Result<Vec<Field>> {
    let named = matches!(fields, syn::Fields::Named(_));
    let mut error = ErrorBuilder::new();
    let mut ret = vec![];
    for (i, field) in fields.into_iter().enumerate() {
        let attr = match FieldAttributes::from_attrs(&field.attrs, named) {
            Ok(attr) => attr,
            Err(err) => {
                error.with_error(err);
                continue;
            }
        };
        let (member, name) = match field.ident {
            Some(ident) => {
                let name = match &attr.rename {
                    Some(rename) => rename.value(),
                    None => ident.unraw().to_string(),
                };
                (syn::Member::Named(ident), name)
            }
            None => (syn::Member::Unnamed(syn::Index::from(i)), i.to_string()),
        };
        ret.push(Field {
            member,
            name,
            ty: field.ty,
            attr,
        });
    }
    error.ok_or_build()?;

    let mut seen = HashMap::new();
    for field in ret.iter().filter(|field| !field.attr.skip) {
        if let Some(previous) = seen.insert(field.name.as_str(), &field.member) {
            let msg = format!(
                "group name `{}` is already used by field `{}`",
                field.name,
                previous.to_token_stream()
            );
            error.with_spanned(&field.member, msg);
        }
    }
    error.ok_or_build()?;
    Ok(ret)
}

pub fn parse_struct(
    ident: syn::Ident,
    generics: syn::Generics,
    attrs: Vec<syn::Attribute>,
    data: syn::DataStruct,
) -> Result<TokenStream> {
    let attr = StructAttributes::from_attrs(&attrs)?;
    let generics = add_bounds(generics)?;
    let signature = construct_signature();

    let body = match attr.kind {
        StructKind::FromStr => quote! {
            fn shape() -> ::regextract::Shape {
                ::regextract::Shape::Leaf(::regextract::LeafKind::Parse)
            }
            #signature {
                cx.parse(node, span)
            }
        },
        StructKind::FromString => quote! {
            fn shape() -> ::regextract::Shape {
                ::regextract::Shape::Leaf(::regextract::LeafKind::StringConstruct)
            }
            #[allow(unused_variables)]
            #signature {
                let text = ::std::string::ToString::to_string(cx.text(span));
                ::std::result::Result::Ok(<Self as ::std::convert::From<::std::string::String>>::from(text))
            }
        },
        StructKind::Record | StructKind::ByName => {
            if attr.kind == StructKind::ByName && !matches!(data.fields, syn::Fields::Named(_)) {
                let msg = "attribute `by_name` requires a struct with named fields";
                return err_spanned(&ident, msg);
            }
            record(data.fields, attr.kind == StructKind::ByName)?
        }
    };

    let default_pattern = attr
        .pattern
        .as_ref()
        .map(|pattern| pattern.impl_default_pattern(&ident, &generics));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::regextract::Extract for #ident #ty_generics #where_clause {
            #body
        }
        #default_pattern
    })
}

fn record(fields: syn::Fields, by_name: bool) -> Result<TokenStream> {
    let named = matches!(fields, syn::Fields::Named(_));
    let fields = parse_fields(fields)?;
    let signature = construct_signature();

    let bound: Vec<&Field> = fields.iter().filter(|field| !field.attr.skip).collect();
    let descriptions: Vec<TokenStream> = bound
        .iter()
        .map(|field| {
            let name = &field.name;
            let ty = &field.ty;
            quote! { ::regextract::Field::new::<#ty>(#name) }
        })
        .collect();
    let shape = if !named {
        quote! { ::regextract::RecordShape::positional(vec![#(#descriptions),*]) }
    } else if by_name {
        quote! { ::regextract::RecordShape::named(vec![], vec![#(#descriptions),*]) }
    } else {
        quote! { ::regextract::RecordShape::named(vec![#(#descriptions),*], vec![#(#descriptions),*]) }
    };

    let members: Vec<&syn::Member> = fields.iter().map(|field| &field.member).collect();
    let positional = fields.iter().map(|field| match &field.attr.default {
        Some(default) if field.attr.skip => default.clone(),
        _ => quote! { fields.next()? },
    });
    let unbound: Vec<TokenStream> = fields.iter().map(Field::unbound).collect();
    let absent = fields.iter().map(Field::absent);

    let initial = if by_name {
        quote! { Self { #(#members: #unbound),* } }
    } else {
        quote! {
            if fields.is_positional() {
                Self { #(#members: #positional),* }
            } else {
                Self { #(#members: #unbound),* }
            }
        }
    };

    let construct = if named {
        let names = bound.iter().map(|field| &field.name);
        let bound_members = bound.iter().map(|field| &field.member);
        quote! {
            let mut value = #initial;
            for property in fields.properties() {
                match property.name() {
                    #(#names => value.#bound_members = property.value()?,)*
                    _ => return ::std::result::Result::Err(property.unknown()),
                }
            }
            ::std::result::Result::Ok(value)
        }
    } else {
        quote! {
            ::std::result::Result::Ok(#initial)
        }
    };

    Ok(quote! {
        fn shape() -> ::regextract::Shape {
            ::regextract::Shape::Record(#shape)
        }

        #[allow(unused_mut, unused_variables)]
        #signature {
            let mut fields = ::regextract::Fields::new(node, cx, span);
            #construct
        }

        fn absent() -> ::std::option::Option<Self> {
            ::std::option::Option::Some(Self { #(#members: #absent),* })
        }
    })
}

pub fn parse_enum(
    ident: syn::Ident,
    generics: syn::Generics,
    attrs: Vec<syn::Attribute>,
    data: syn::DataEnum,
) -> Result<TokenStream> {
    let attr = EnumAttributes::from_attrs(&attrs)?;
    let generics = add_bounds(generics)?;
    let signature = construct_signature();

    let mut error = ErrorBuilder::new();
    let mut texts: Vec<String> = vec![];
    let mut variants: Vec<syn::Ident> = vec![];
    let mut default: Option<syn::Ident> = None;
    for variant in data.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            let msg = "only variants without fields can be parsed from text";
            error.with_spanned(&variant.fields, msg);
            continue;
        }
        let variant_attr = match VariantAttributes::from_attrs(&variant.attrs) {
            Ok(attr) => attr,
            Err(err) => {
                error.with_error(err);
                continue;
            }
        };

        let name = variant.ident.unraw().to_string();
        let text = match (&variant_attr.rename, attr.rename_all) {
            (Some(rename), _) => rename.value(),
            (None, Some(case)) => name.to_case(case),
            (None, None) => name,
        };
        if let Some(i) = texts.iter().position(|other| *other == text) {
            let msg = format!(
                "variants `{}` and `{}` are both parsed from \"{}\"",
                variants[i], variant.ident, text
            );
            error.with_spanned(&variant.ident, msg);
        }

        if variant_attr.default {
            if let Some(previous) = &default {
                let msg = format!("variant `{}` is already the default", previous);
                error.with_spanned(&variant.ident, msg);
            }
            default = Some(variant.ident.clone());
        }

        texts.push(text);
        variants.push(variant.ident);
    }
    error.ok_or_build()?;

    // without a marked default, an absent group is the first variant
    let absent = default.or_else(|| variants.first().cloned()).map(|default| {
        quote! {
            fn absent() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(Self::#default)
            }
        }
    });

    let default_pattern = attr
        .pattern
        .as_ref()
        .map(|pattern| pattern.impl_default_pattern(&ident, &generics));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::regextract::Extract for #ident #ty_generics #where_clause {
            fn shape() -> ::regextract::Shape {
                ::regextract::Shape::Leaf(::regextract::LeafKind::Enum)
            }

            #signature {
                const EXPECTED: &[&str] = &[#(#texts),*];
                let text = cx.text(span);
                match text {
                    #(#texts => ::std::result::Result::Ok(Self::#variants),)*
                    _ => ::std::result::Result::Err(::regextract::ExtractError::conversion::<Self>(
                        node.group().name(),
                        text,
                        ::regextract::UnknownVariantError {
                            text: ::std::string::ToString::to_string(text),
                            expected: EXPECTED,
                        },
                    )),
                }
            }

            #absent
        }
        #default_pattern
    })
}

pub fn parse_union(ident: syn::Ident, _: syn::DataUnion) -> Result<TokenStream> {
    let msg = "`Extract` can only be derived for structs and enums";
    err_spanned(ident, msg)
}

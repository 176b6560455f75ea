use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use syn::punctuated::Punctuated;

use crate::*;

mod r#enum; // not all of these need to be r#, but this looks nicer
mod r#field;
mod r#struct;
mod r#variant;
pub use r#enum::*;
pub use r#field::*;
pub use r#struct::*;
pub use r#variant::*;

pub trait Attr: Debug + Display + Copy + Ord + Hash + 'static {
    fn all() -> &'static [Self];
    fn context() -> Context;

    fn as_str(&self) -> &'static str;
}

macro_rules! declare_attr {
    (
        $attr_mod: ident :: $attr_enum: ident {
            $($attr_ident: ident $attr_text: literal,)+
        },
        $context_enum: ident {
            $($context: ident $context_name: literal [ $($context_attr: ident),+ ],)+
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $context_enum {
            $($context),+
        }
        impl $context_enum {
            pub const ALL: &'static [Self] = &[ $(Self::$context),+ ];
            pub const ALL_NAMES: &'static [&'static str] = &[ $($context_name),+ ];
            pub const fn as_str(&self) -> &'static str {
                Self::ALL_NAMES[*self as usize]
            }
            pub const fn all_attr_names(&self) -> &'static [&'static str] {
                match self {
                    $(Self::$context => $attr_mod::$context::ALL_NAMES),+
                }
            }
        }
        impl std::fmt::Display for $context_enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        pub mod $attr_mod {
            pub enum $attr_enum {
                $($attr_ident),+
            }
            impl $attr_enum {
                pub const fn as_str(&self) -> &'static str {
                    match self {
                        $(Self::$attr_ident => $attr_text),+
                    }
                }
            }

            $(
                #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
                pub enum $context {
                    $($context_attr),+
                }
                impl $context {
                    pub const ALL: &'static [Self] = &[$(Self::$context_attr),+];
                    pub const ALL_NAMES: &'static [&'static str] = &[$(Self::$context_attr.as_str()),+];
                    pub const fn as_str(&self) -> &'static str {
                        match self {
                            $(Self::$context_attr => $attr_enum::$context_attr.as_str()),+
                        }
                    }
                }
                impl std::fmt::Display for $context {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        write!(f, "{}", self.as_str())
                    }
                }
                impl super::Attr for $context {
                    fn all() -> &'static [Self] {
                        Self::ALL
                    }
                    fn context() -> super::$context_enum {
                        super::$context_enum::$context
                    }
                    fn as_str(&self) -> &'static str {
                        self.as_str()
                    }
                }
            )+
        }
    };
}

declare_attr!(
    attr::All {
        // structs and enums
        Pattern "pattern",
        Flags "flags",
        // structs
        ByName "by_name",
        FromStr "from_str",
        FromString "from_string",
        // enums
        RenameAll "rename_all",
        // fields and variants
        Rename "rename",
        Default "default",
        // fields
        Skip "skip",
    },
    Context {
        Struct "structs" [ Pattern, Flags, ByName, FromStr, FromString ],
        Enum "enums" [ Pattern, Flags, RenameAll ],
        Variant "variants" [ Rename, Default ],
        Field "fields" [ Rename, Default, Skip ],
    }
);

fn find_match<A: Attr>(s: &str, src: &TokenStream) -> syn::Result<A> {
    if let Some(attr) = A::all().iter().find(|attr| attr.as_str() == s) {
        return Ok(*attr);
    }

    let context = A::context();
    let valid = list_items(context.all_attr_names(), |s| format!("`{}`", s));

    let others: Vec<Context> = Context::ALL
        .iter()
        .copied()
        .filter(|&other| other != context)
        .collect();

    let found_others: Vec<Context> = others
        .iter()
        .copied()
        .filter(|other| other.all_attr_names().contains(&s))
        .collect();
    if !found_others.is_empty() {
        let others = list_items(&found_others, |other| other.to_string());
        let msg = format!(
            "attribute `{}` can only be used on {}.\n{} can have the following attributes: {}",
            s, others, context, valid
        );
        return Err(syn::Error::new_spanned(src, msg));
    }

    if let Some(similar) = find_closest(s, context.all_attr_names()) {
        let msg = format!("unknown attribute `{}`. Did you mean `{}`?", s, similar);
        return Err(syn::Error::new_spanned(src, msg));
    }

    for other in &others {
        if let Some(similar) = find_closest(s, other.all_attr_names()) {
            let msg = format!(
                "unknown attribute `{}` is similar to `{}`, which can only be used on {}.\n{} can have the following attributes: {}",
                s, similar, other, context, valid
            );
            return Err(syn::Error::new_spanned(src, msg));
        }
    }

    let msg = format!("unknown attribute `{}`. Valid attributes are: {}", s, valid);
    Err(syn::Error::new_spanned(src, msg))
}

/// One `name` or `name = value` inside of `#[extract(...)]`.
pub struct Attribute<A: Attr> {
    pub kind: A,
    pub value: Option<syn::Expr>,
    pub src: TokenStream,
}

impl<A: Attr> Parse for Attribute<A> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut src = TokenStream::new();

        let name = input.parse::<syn::Ident>()?;
        src.extend(quote! { #name });
        let kind = find_match(&name.to_string(), &src)?;

        let mut value = None;
        let peek = input.lookahead1();
        if !input.is_empty() && !peek.peek(Token![,]) {
            if !peek.peek(Token![=]) {
                return Err(peek.error());
            }
            let eq_sign = input.parse::<Token![=]>()?;

            if input.is_empty() {
                let msg = "expected an expression after `=`";
                return Err(syn::Error::new_spanned(eq_sign, msg));
            }
            let expr = input.parse::<syn::Expr>()?;
            src.extend(quote! { #eq_sign #expr });
            value = Some(expr);
        }

        Ok(Self { kind, value, src })
    }
}

impl<A: Attr> Attribute<A> {
    /// The value of the attribute, which is required.
    pub fn value_as<T: Parse>(&self, description: &str, addition: Option<&str>) -> Result<T> {
        if let Some(value) = &self.value {
            syn::parse2(quote! { #value })
        } else {
            let mut msg = format!(
                "attribute `{0}` has the format: `#[extract({0} = {1})]`",
                self.kind, description
            );
            if let Some(addition) = addition {
                msg.push('\n');
                msg.push_str(addition);
            }
            err_spanned(&self.src, msg)
        }
    }

    /// Checks that the attribute was given without a value.
    pub fn expect_no_value(&self) -> Result<()> {
        match &self.value {
            Some(value) => {
                let msg = format!("attribute `{}` does not take a value", self.kind);
                err_spanned(value, msg)
            }
            None => Ok(()),
        }
    }
}

/// All `#[extract(...)]` attributes on one item.
pub struct Attributes<A: Attr> {
    map: HashMap<A, Attribute<A>>,
}

impl<A: Attr> Attributes<A> {
    pub fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut map = HashMap::<A, Attribute<A>>::new();
        for attr in attrs {
            if !attr.path().is_ident("extract") {
                continue;
            }
            let list = match &attr.meta {
                syn::Meta::List(list) => list,
                // require_list would only say "expected '('" and point at the `=`
                syn::Meta::Path(path) => {
                    let msg = "expected attribute arguments in parentheses: `extract(...)`";
                    return err_spanned(path, msg);
                }
                syn::Meta::NameValue(nv) => {
                    let msg = format!(
                        "attribute arguments must be in parentheses: `extract({})`",
                        nv.value.to_token_stream()
                    );
                    return err_spanned(nv, msg);
                }
            };
            if list.tokens.is_empty() {
                continue;
            }

            let parsed =
                list.parse_args_with(Punctuated::<Attribute<A>, Token![,]>::parse_terminated)?;
            for attr in parsed {
                use std::collections::hash_map::Entry;
                match map.entry(attr.kind) {
                    Entry::Occupied(entry) => {
                        let msg = format!("attribute `{}` is specified multiple times", attr.kind);
                        let mut error = syn::Error::new_spanned(attr.src, msg);
                        error.combine(syn::Error::new_spanned(
                            &entry.get().src,
                            "previous use here",
                        ));
                        return Err(error);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(attr);
                    }
                }
            }
        }
        Ok(Self { map })
    }

    pub fn take(&mut self, kind: A) -> Option<Attribute<A>> {
        self.map.remove(&kind)
    }

    /// Takes an attribute that is a plain switch.
    pub fn flag(&mut self, kind: A) -> Result<bool> {
        match self.take(kind) {
            Some(attr) => attr.expect_no_value().map(|()| true),
            None => Ok(false),
        }
    }

    /// Checks that at most one of `kinds` is present.
    pub fn exclusive(&self, kinds: &[A]) -> Result<()> {
        let mut found: Vec<&Attribute<A>> =
            kinds.iter().filter_map(|kind| self.map.get(kind)).collect();
        found.sort_by_key(|attr| attr.kind); // so that the error messages always have the same order

        let msg = match found.as_slice() {
            [] | [_] => return Ok(()),
            [a, b] => format!("cannot specify both `{}` and `{}`", a.kind, b.kind),
            _ => {
                let items = list_items(&found, |attr| format!("`{}`", attr.kind));
                format!("only one of {} is allowed", items)
            }
        };
        let mut error = ErrorBuilder::new();
        for attr in found {
            error.with_spanned(&attr.src, &msg);
        }
        error.ok_or_build()
    }
}

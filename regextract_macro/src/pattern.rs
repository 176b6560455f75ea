use crate::*;

/// Inline flag letters and the `ExtractOptions` builder method each one enables.
static FLAGS: &[(char, &str)] = &[
    ('i', "case_insensitive"),
    ('m', "multi_line"),
    ('s', "dot_matches_new_line"),
    ('x', "ignore_whitespace"),
    ('U', "swap_greed"),
    ('R', "crlf"),
];

/// `#[extract(pattern = "...", flags = "...")]`, checked to be a valid regex.
pub struct DefaultPatternAttr {
    pattern: syn::LitStr,
    options: Vec<syn::Ident>,
}

impl DefaultPatternAttr {
    pub fn from_attrs<A: Attr>(
        pattern: Option<Attribute<A>>,
        flags: Option<Attribute<A>>,
    ) -> Result<Option<Self>> {
        let pattern = match (pattern, flags.as_ref()) {
            (Some(pattern), _) => pattern.value_as::<syn::LitStr>(
                "r\"<regex>\"",
                Some("where `<regex>` is the pattern used when no other pattern is given"),
            )?,
            (None, Some(flags)) => {
                let msg = format!("attribute `{}` requires a `pattern` attribute", flags.kind);
                return err_spanned(&flags.src, msg);
            }
            (None, None) => return Ok(None),
        };

        let mut parser = regex_syntax::ParserBuilder::new();
        let mut options = vec![];
        if let Some(flags) = flags {
            let flag_hint = list_items(FLAGS, |(flag, _)| format!("`{}`", flag));
            let value = flags.value_as::<syn::LitStr>(
                "\"<flags>\"",
                Some(&format!("where `<flags>` are any of {}", flag_hint)),
            )?;
            for flag in value.value().chars() {
                let Some((_, method)) = FLAGS.iter().find(|(c, _)| *c == flag) else {
                    let msg = format!("unknown flag `{}`. Valid flags are: {}", flag, flag_hint);
                    return err_spanned(value, msg);
                };
                match flag {
                    'i' => parser.case_insensitive(true),
                    'm' => parser.multi_line(true),
                    's' => parser.dot_matches_new_line(true),
                    'x' => parser.ignore_whitespace(true),
                    'U' => parser.swap_greed(true),
                    _ => parser.crlf(true),
                };
                options.push(syn::Ident::new(method, value.span()));
            }
        }

        if let Err(err) = parser.build().parse(&pattern.value()) {
            let msg = format!("invalid pattern:\n{}", err);
            return err_spanned(pattern, msg);
        }

        Ok(Some(Self { pattern, options }))
    }

    pub fn impl_default_pattern(&self, ident: &syn::Ident, generics: &syn::Generics) -> TokenStream {
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let pattern = &self.pattern;
        let options = &self.options;
        quote! {
            #[automatically_derived]
            impl #impl_generics ::regextract::DefaultPattern for #ident #ty_generics #where_clause {
                const PATTERN: &'static str = #pattern;
                fn options() -> ::regextract::ExtractOptions {
                    ::regextract::ExtractOptions::builder()
                        #(.#options())*
                        .build()
                }
            }
        }
    }
}

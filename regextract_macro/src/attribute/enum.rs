use super::*;

use convert_case::Case;

static CASES: &[(&str, Case)] = &[
    ("lower case", Case::Lower),
    ("UPPER CASE", Case::Upper),
    ("lowercase", Case::Flat),
    ("UPPERCASE", Case::UpperFlat),
    ("PascalCase", Case::Pascal),
    ("camelCase", Case::Camel),
    ("snake_case", Case::Snake),
    ("SCREAMING_SNAKE_CASE", Case::ScreamingSnake),
    ("kebab-case", Case::Kebab),
    ("SCREAMING-KEBAB-CASE", Case::UpperKebab),
];

pub struct EnumAttributes {
    /// Case of the variant names
    pub rename_all: Option<Case>,
    pub pattern: Option<DefaultPatternAttr>,
}

impl EnumAttributes {
    pub fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut attrs = Attributes::<attr::Enum>::from_attrs(attrs)?;

        let rename_all = attrs
            .take(attr::Enum::RenameAll)
            .map(|attr| case_from_attr(&attr))
            .transpose()?;
        let pattern = DefaultPatternAttr::from_attrs(
            attrs.take(attr::Enum::Pattern),
            attrs.take(attr::Enum::Flags),
        )?;
        Ok(Self {
            rename_all,
            pattern,
        })
    }
}

fn case_from_attr(attr: &Attribute<attr::Enum>) -> Result<Case> {
    let names: Vec<&str> = CASES.iter().map(|(name, _)| *name).collect();
    let valid_hint = list_items(&names, |name| format!("\"{}\"", name));
    let casing_hint = format!("where `<casing>` is one of {}", valid_hint);

    let value = attr.value_as::<syn::LitStr>("\"<casing>\"", Some(&casing_hint))?;
    let text = value.value();
    if let Some((_, case)) = CASES.iter().find(|(name, _)| *name == text) {
        return Ok(*case);
    }
    let mut msg = format!(
        "invalid value for attribute `{}`: \"{}\".\nvalid values are: {}",
        attr.kind, text, valid_hint
    );
    if let Some(similar) = find_closest(&text, &names) {
        msg = format!("{}\nDid you mean \"{}\"?", msg, similar);
    }
    err_spanned(value, msg)
}

use super::*;

pub struct VariantAttributes {
    /// The text of the variant
    pub rename: Option<syn::LitStr>,
    /// The variant is the value of an absent group
    pub default: bool,
}

impl VariantAttributes {
    pub fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut attrs = Attributes::<attr::Variant>::from_attrs(attrs)?;
        let rename = attrs
            .take(attr::Variant::Rename)
            .map(|attr| {
                attr.value_as::<syn::LitStr>(
                    "\"<text>\"",
                    Some("where `<text>` is the text that is parsed as this variant"),
                )
            })
            .transpose()?;
        let default = attrs.flag(attr::Variant::Default)?;
        Ok(Self { rename, default })
    }
}

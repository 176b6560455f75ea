use super::*;

pub struct FieldAttributes {
    /// Name of the group bound to the field
    pub rename: Option<syn::LitStr>,
    /// Value of the field when no group is bound to it
    pub default: Option<TokenStream>,
    pub skip: bool,
}

impl FieldAttributes {
    pub fn from_attrs(attrs: &[syn::Attribute], named: bool) -> Result<Self> {
        let mut attrs = Attributes::<attr::Field>::from_attrs(attrs)?;
        attrs.exclusive(&[attr::Field::Rename, attr::Field::Skip])?;

        let rename = match attrs.take(attr::Field::Rename) {
            Some(attr) if !named => {
                let msg = format!(
                    "attribute `{}` can only be used on named fields. Fields of tuple structs are bound by position",
                    attr.kind
                );
                return err_spanned(&attr.src, msg);
            }
            Some(attr) => {
                let name = attr.value_as::<syn::LitStr>(
                    "\"<name>\"",
                    Some("where `<name>` is the name of the capture group bound to this field"),
                )?;
                if !is_group_name(&name.value()) {
                    let msg = format!(
                        "invalid group name `{}`: a group name starts with a letter or `_`, followed by letters, digits or `_`",
                        name.value()
                    );
                    return err_spanned(name, msg);
                }
                Some(name)
            }
            None => None,
        };

        let default = attrs.take(attr::Field::Default).map(|attr| match attr.value {
            Some(expr) => quote! { #expr },
            None => quote! { ::std::default::Default::default() },
        });
        let skip = attrs.flag(attr::Field::Skip)?;
        let default = match default {
            None if skip => Some(quote! { ::std::default::Default::default() }),
            default => default,
        };

        Ok(Self {
            rename,
            default,
            skip,
        })
    }
}

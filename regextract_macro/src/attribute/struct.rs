use super::*;

/// How a struct is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    /// Fields from numbered groups in order, or from named groups by name
    Record,
    /// Fields only from named groups
    ByName,
    /// The text of one group, with `FromStr`
    FromStr,
    /// The text of one group, with `From<String>`
    FromString,
}

pub struct StructAttributes {
    pub kind: StructKind,
    pub pattern: Option<DefaultPatternAttr>,
}

impl StructAttributes {
    pub fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut attrs = Attributes::<attr::Struct>::from_attrs(attrs)?;
        attrs.exclusive(&[
            attr::Struct::ByName,
            attr::Struct::FromStr,
            attr::Struct::FromString,
        ])?;

        let kind = if attrs.flag(attr::Struct::ByName)? {
            StructKind::ByName
        } else if attrs.flag(attr::Struct::FromStr)? {
            StructKind::FromStr
        } else if attrs.flag(attr::Struct::FromString)? {
            StructKind::FromString
        } else {
            StructKind::Record
        };

        let pattern = DefaultPatternAttr::from_attrs(
            attrs.take(attr::Struct::Pattern),
            attrs.take(attr::Struct::Flags),
        )?;
        Ok(Self { kind, pattern })
    }
}

use std::ops::*;

macro_rules! impl_wrapper_ops {
    ($name: ident) => {
        impl<U> Deref for $name<U> {
            type Target = U;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl<U> DerefMut for $name<U> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
        impl<U: PartialEq> PartialEq<U> for $name<U> {
            fn eq(&self, rhs: &U) -> bool {
                self.0.eq(rhs)
            }
        }
    };
}

/// The remaining elements of a long tuple, spread into the surrounding tuple.
///
/// Tuples implement [`Extract`](crate::Extract) for up to 12 elements. Longer ones, or ones
/// that are built up from smaller tuples, put their last elements into a `Rest`. Its elements
/// take the following capture groups as if they were elements of the outer tuple itself:
/// ```
/// # use regextract::*;
/// type Date = (u16, u8, u8);
/// let value: (String, Rest<Date>) = extract("due 2024-01-31", r"(\w+) (\d+)-(\d+)-(\d+)").unwrap();
/// assert_eq!(value.0, "due");
/// assert_eq!(value.1, (2024, 1, 31));
/// ```
/// Without the `Rest`, the `Date` would need a group of its own: `(\w+) ((\d+)-(\d+)-(\d+))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rest<U>(pub U);

impl_wrapper_ops!(Rest);

impl<U> Rest<U> {
    /// Returns the wrapped elements.
    pub fn into_inner(self) -> U {
        self.0
    }
}

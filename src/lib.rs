#![deny(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::bare_urls
)]

//! Binds the capture groups of a regex to typed values.
//!
//! Capture groups are matched against the structure of a target type: tuples take one group per
//! element, structs take their fields from numbered groups in order or from named groups by name,
//! and collections take one element per repetition of a group.
//!
//! ```
//! use regextract::*;
//!
//! let (low, high): (u32, u32) = extract("12-34", r"(\d+)-(\d+)").unwrap();
//! assert_eq!((low, high), (12, 34));
//!
//! let numbers: Vec<u32> = extract("1 2 3", r"(?:(\d+) ?)+").unwrap();
//! assert_eq!(numbers, [1, 2, 3]);
//! ```
//!
//! # Plans
//! Everything that can be checked without an input is checked when a [`Plan`] is built: the
//! pattern's syntax, and whether its groups fit the target type. A plan can then be reused for any
//! number of inputs, also from several threads at once.
//! ```
//! # use regextract::*;
//! #[derive(Extract, Debug, PartialEq)]
//! struct Bounds {
//!     low: u32,
//!     high: u32,
//! }
//!
//! let plan = Plan::<(Bounds, char, String)>::new(r"((\d+)-(\d+)) (\w): (.*)").unwrap();
//! let (bounds, letter, password) = plan.extract("2-12 c: abcdefg").unwrap();
//! assert_eq!(bounds, Bounds { low: 2, high: 12 });
//! assert_eq!(letter, 'c');
//! assert_eq!(password, "abcdefg");
//!
//! // the pattern has one group too few for the tuple
//! assert!(Plan::<(Bounds, char, String)>::new(r"((\d+)-(\d+)) (\w): .*").is_err());
//! ```
//!
//! # Repetitions
//! Unlike most regex engines, every repetition of a group is kept, not just the last one. Groups
//! bound to a collection get one element per repetition, and a collection nested in another one
//! only sees the repetitions within its own parent's capture:
//! ```
//! # use regextract::*;
//! let rows: Vec<Vec<u8>> = extract("1,2;3;4,5,6", r"(?:((?:(\d),?)+);?)+").unwrap();
//! assert_eq!(rows, [vec![1, 2], vec![3], vec![4, 5, 6]]);
//! ```
//! Groups that repeat together are taken round by round, e.g. to fill a map:
//! ```
//! # use regextract::*;
//! # use std::collections::BTreeMap;
//! let map: BTreeMap<String, u32> = extract("a=1,b=2", r"(?:(\w+)=(\d+),?)+").unwrap();
//! assert_eq!(map["b"], 2);
//! ```
//!
//! # Absent groups
//! A group that did not take part in the match, like the other side of an alternation, builds the
//! type's [`absent`](Extract::absent) value: `None` for [`Option`], zero for numbers, empty for
//! strings and collections, the unspecified address for IP and socket addresses, and the first
//! variant for derived enums.
//! ```
//! # use regextract::*;
//! let value: (Option<i32>, String) = extract("asdf", r"(\d+)|(.*)").unwrap();
//! assert_eq!(value, (None, "asdf".to_string()));
//! ```
//!
//! # Logging
//! Plans are built inside a `tracing` span, and the builder and executor emit `trace` events for
//! every decision. Install a subscriber to see them.

mod capture_history;
pub use capture_history::{Capture, CaptureHistory, Span};

mod errors;
pub use errors::*;

mod extract;
pub use extract::*;

mod group_tree;
pub use group_tree::*;

mod options;
pub use options::*;

mod plan;
pub use plan::*;

mod shape;
pub use shape::*;

mod types;
pub use types::*;

mod macros;

#[doc(hidden)]
pub mod __macro_utilities;

/// Implements [`Extract`] for a struct or a fieldless enum.
///
/// ## Structs
/// Fields are bound to numbered groups in declaration order, or to named groups by their name.
/// Both can be mixed: numbered groups fill the fields first, named groups then overwrite fields
/// by name. Fields that no group fills take their [`absent`](Extract::absent) value.
///
/// | Attribute                                | Effect                                           |
/// |------------------------------------------|--------------------------------------------------|
/// | `#[extract(pattern = "...")]`            | implements [`DefaultPattern`]                     |
/// | `#[extract(flags = "imsxUR")]`           | flags of the default pattern, see [`ExtractOptions::from_flags`] |
/// | `#[extract(by_name)]`                    | only bind named groups                           |
/// | `#[extract(from_str)]`                   | build from the text of a single group with `FromStr` |
/// | `#[extract(from_string)]`                | build from the text of a single group with `From<String>` |
/// | field: `#[extract(rename = "...")]`      | name of the group bound to the field             |
/// | field: `#[extract(default)]`             | use `Default::default()` when the field is not bound |
/// | field: `#[extract(default = expr)]`      | use `expr` when the field is not bound           |
/// | field: `#[extract(skip)]`                | never bind the field, it always takes its default |
///
/// ## Enums
/// Fieldless enums are parsed from the name of a variant.
///
/// | Attribute                                | Effect                                           |
/// |------------------------------------------|--------------------------------------------------|
/// | `#[extract(rename_all = "...")]`         | case of all variant names: `lowercase`, `UPPERCASE`, `PascalCase`, `camelCase`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`, `SCREAMING-KEBAB-CASE` |
/// | variant: `#[extract(rename = "...")]`    | text of one variant                              |
/// | variant: `#[extract(default)]`           | value when the group is absent, instead of the first variant |
///
/// ```
/// # use regextract::*;
/// #[derive(Extract, Debug, PartialEq)]
/// #[extract(rename_all = "snake_case")]
/// enum Level {
///     Info,
///     #[extract(rename = "warn")]
///     Warning,
///     #[extract(default)]
///     NotSet,
/// }
///
/// #[derive(Extract, Debug, PartialEq)]
/// struct Entry {
///     #[extract(rename = "lvl")]
///     level: Level,
///     message: String,
///     #[extract(skip)]
///     seen: bool,
/// }
///
/// let entry: Entry = extract("[warn] disk full", r"\[(?<lvl>\w+)\] (?<message>.*)").unwrap();
/// assert_eq!(entry.level, Level::Warning);
/// assert_eq!(entry.message, "disk full");
/// assert!(!entry.seen);
///
/// let entry: Entry = extract("disk full", r"(?:\[(?<lvl>\w+)\] )?(?<message>.*)").unwrap();
/// assert_eq!(entry.level, Level::NotSet);
/// ```
pub use regextract_macro::Extract;

#[doc(hidden)]
pub use bitflags;

#[doc(hidden)]
pub use lazy_static;

/// Builds a plan for `pattern` and runs it on `input`.
///
/// The plan is thrown away afterwards. When the same pattern is used more than once, build a
/// [`Plan`] and reuse it, or use [`extract!`] which does so automatically.
///
/// ```
/// # use regextract::*;
/// let (name, age): (String, u8) = extract("Alice (42)", r"(\w+) \((\d+)\)").unwrap();
/// assert_eq!(name, "Alice");
/// assert_eq!(age, 42);
///
/// let err = extract::<(String, u8)>("Bob", r"(\w+) \((\d+)\)").unwrap_err();
/// assert!(err.is_input_error());
/// ```
pub fn extract<T: Extract>(input: &str, pattern: &str) -> Result<T, Error> {
    let plan = Plan::<T>::new(pattern)?;
    Ok(plan.extract(input)?)
}

/// Like [`extract`], but treats any error caused by the input as "no value".
///
/// Errors in the pattern, or a pattern that does not fit `T`, are still returned.
///
/// ```
/// # use regextract::*;
/// assert_eq!(try_extract::<u8>("x=7", r"x=(\d+)").unwrap(), Some(7));
/// assert_eq!(try_extract::<u8>("x=700", r"x=(\d+)").unwrap(), None);
/// assert!(try_extract::<(u8, u8)>("x=7", r"x=(\d+)").is_err());
/// ```
pub fn try_extract<T: Extract>(input: &str, pattern: &str) -> Result<Option<T>, Error> {
    let plan = Plan::<T>::new(pattern)?;
    Ok(plan.try_extract(input))
}

/// Like [`extract`], with the pattern of the type's [`DefaultPattern`].
pub fn extract_default<T: DefaultPattern>(input: &str) -> Result<T, Error> {
    let plan = Plan::<T>::from_default()?;
    Ok(plan.extract(input)?)
}

/// The one-shot functions as methods on `str`.
///
/// ```
/// use regextract::ExtractExt;
///
/// let port: u16 = "localhost:8080".extract(r":(\d+)").unwrap();
/// assert_eq!(port, 8080);
/// ```
pub trait ExtractExt {
    /// See [`extract`](crate::extract()).
    fn extract<T: Extract>(&self, pattern: &str) -> Result<T, Error>;
    /// See [`try_extract`].
    fn try_extract<T: Extract>(&self, pattern: &str) -> Result<Option<T>, Error>;
    /// See [`extract_default`].
    fn extract_default<T: DefaultPattern>(&self) -> Result<T, Error>;
}

impl ExtractExt for str {
    fn extract<T: Extract>(&self, pattern: &str) -> Result<T, Error> {
        extract(self, pattern)
    }
    fn try_extract<T: Extract>(&self, pattern: &str) -> Result<Option<T>, Error> {
        try_extract(self, pattern)
    }
    fn extract_default<T: DefaultPattern>(&self) -> Result<T, Error> {
        extract_default(self)
    }
}

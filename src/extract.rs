use crate::*;

mod impls;

/// A type that can be built from the captures of a regex match.
///
/// The trait describes the type's [`Shape`] to the plan builder, and builds a value when the plan
/// runs. Both sides have to agree: [`construct`](Extract::construct) is only ever called with a
/// [`PlanNode`] that was built from [`shape`](Extract::shape).
///
/// Implementations exist for
/// - numbers, `bool`, `char` and the network address types (parsed with [`FromStr`](std::str::FromStr))
/// - `String` (the captured text), `PathBuf` and `OsString`
/// - `Option<T>` and `Box<T>`
/// - tuples of up to 12 elements, with [`Rest`] for longer ones
/// - `Vec`, `VecDeque`, `BTreeSet`, `HashSet` and the maps `BTreeMap` and `HashMap` (from `(K, V)` pairs)
///
/// ## Implementing
/// Structs and fieldless enums should use `#[derive(Extract)]`:
/// ```
/// # use regextract::*;
/// #[derive(Extract, Debug, PartialEq)]
/// struct Bounds {
///     low: u32,
///     high: u32,
/// }
///
/// #[derive(Extract, Debug, PartialEq)]
/// #[extract(rename_all = "lowercase")]
/// enum Unit {
///     Meters,
///     Feet,
/// }
///
/// let value: (Bounds, Unit) = extract("2-12 feet", r"((\d+)-(\d+)) (\w+)").unwrap();
/// assert_eq!(value, (Bounds { low: 2, high: 12 }, Unit::Feet));
/// ```
/// Types that implement [`FromStr`](std::str::FromStr) can use [`extract_from_str!`], and
/// `bitflags` types can use [`extract_flags!`].
pub trait Extract: Sized + 'static {
    /// Describes how the type is built.
    fn shape() -> Shape;

    /// Builds a value for `node` from the captures in `span`.
    ///
    /// `span` is the capture of `node`'s group, except for nodes whose
    /// [`scope`](PlanNode::scope) is [`Scope::Inherit`], which get the span of their parent.
    fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError>;

    /// The value used when the group of this type did not participate in the match.
    ///
    /// Every type that has a zero value should return it. `None` is meant for types without one,
    /// like [`NonZeroU32`](std::num::NonZeroU32), and turns an absent group into an
    /// [`ExtractError::Absent`].
    fn absent() -> Option<Self> {
        None
    }

    /// Takes this type's value from the elements of a tuple.
    #[doc(hidden)]
    fn from_elements(elements: &mut Elements<'_, '_>) -> Result<Self, ExtractError> {
        elements.next_value()
    }

    /// The element types this type contributes to a surrounding tuple, if it is spread into it.
    #[doc(hidden)]
    fn spread() -> Option<Vec<TypeRef>> {
        None
    }
}

/// A pattern attached to a type, used when no pattern is given.
///
/// Usually implemented with `#[extract(pattern = "...")]` on a derived type:
/// ```
/// # use regextract::*;
/// #[derive(Extract, Debug, PartialEq)]
/// #[extract(pattern = r"(?<name>[a-z]+)=(?<value>\d+)", flags = "i")]
/// struct Setting {
///     name: String,
///     value: u32,
/// }
///
/// let setting: Setting = extract_default("Width=80").unwrap();
/// assert_eq!(setting, Setting { name: "Width".into(), value: 80 });
/// ```
pub trait DefaultPattern: Extract {
    /// The pattern
    const PATTERN: &'static str;

    /// Flags used to compile [`PATTERN`](DefaultPattern::PATTERN).
    fn options() -> ExtractOptions {
        ExtractOptions::default()
    }
}

/// Tuples that can be spread into a surrounding tuple with [`Rest`].
#[doc(hidden)]
pub trait Spread: Sized {
    fn element_types() -> Vec<TypeRef>;
    fn from_spread(elements: &mut Elements<'_, '_>) -> Result<Self, ExtractError>;
}

/// Implements [`Extract`] for a type that implements [`FromStr`](std::str::FromStr).
///
/// The error of `from_str` has to convert into a [`BoxedError`].
///
/// ```
/// # use regextract::*;
/// #[derive(Debug, PartialEq)]
/// struct Hex(u32);
///
/// impl std::str::FromStr for Hex {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         u32::from_str_radix(s, 16).map(Hex)
///     }
/// }
/// extract_from_str!(Hex);
///
/// let color: (Hex, Hex) = extract("#ff/a0", r"#(\w+)/(\w+)").unwrap();
/// assert_eq!(color, (Hex(255), Hex(160)));
/// ```
#[macro_export]
macro_rules! extract_from_str {
    ($($ty: ty),+ $(,)?) => {
        $(impl $crate::Extract for $ty {
            fn shape() -> $crate::Shape {
                $crate::Shape::Leaf($crate::LeafKind::Parse)
            }
            fn construct(
                node: &$crate::PlanNode,
                cx: &$crate::Execution<'_>,
                span: $crate::Span,
            ) -> ::std::result::Result<Self, $crate::ExtractError> {
                cx.parse(node, span)
            }
        })+
    };
}

/// Implements [`Extract`] for a `bitflags` type, parsing texts like `A | B`.
///
/// An absent group is the empty set of flags.
///
/// ```
/// # use regextract::*;
/// bitflags::bitflags! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     struct Mode: u8 {
///         const READ = 1;
///         const WRITE = 2;
///     }
/// }
/// extract_flags!(Mode);
///
/// let mode: Mode = extract("mode: READ | WRITE", r"mode: (.*)").unwrap();
/// assert_eq!(mode, Mode::READ | Mode::WRITE);
/// ```
#[macro_export]
macro_rules! extract_flags {
    ($($ty: ty),+ $(,)?) => {
        $(impl $crate::Extract for $ty {
            fn shape() -> $crate::Shape {
                $crate::Shape::Leaf($crate::LeafKind::Enum)
            }
            fn construct(
                node: &$crate::PlanNode,
                cx: &$crate::Execution<'_>,
                span: $crate::Span,
            ) -> ::std::result::Result<Self, $crate::ExtractError> {
                let text = cx.text(span);
                $crate::bitflags::parser::from_str::<$ty>(text)
                    .map_err(|err| $crate::ExtractError::conversion::<$ty>(node.group().name(), text, err))
            }
            fn absent() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(<$ty as $crate::bitflags::Flags>::empty())
            }
        })+
    };
}

//! Error types used by the crate. The one returned by the one-shot functions is [`Error`], which
//! wraps the error of each stage:
//!
//! | Stage                   | Error            | When                                            |
//! |-------------------------|------------------|-------------------------------------------------|
//! | reading the pattern     | [`PatternError`] | invalid regex, unbalanced groups, bad group names |
//! | building the plan       | [`PlanError`]    | pattern and target type don't fit together      |
//! | running the plan        | [`ExtractError`] | no match, or a capture failed to convert        |
//!
//! Only [`ExtractError`] is expected during normal operation. The other two mean that the pattern
//! or the target type has to be fixed.

use std::error;

/// Boxed error returned by a conversion function, e.g. the [`Err`](std::str::FromStr::Err) of a
/// [`FromStr`](std::str::FromStr) implementation.
pub type BoxedError = Box<dyn error::Error + Send + Sync + 'static>;

/// The Error returned by [`extract`](crate::extract) and the other one-shot functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pattern could not be read. See [`PatternError`].
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// The pattern does not fit the target type. See [`PlanError`].
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// Running the plan against the input failed. See [`ExtractError`].
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl Error {
    /// Returns `true` if the error was raised while running a plan, as opposed to while building it.
    ///
    /// Errors from building a plan mean that the pattern or the type is wrong, while errors from
    /// running it mean that the input is.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Extract(_))
    }
}

/// Errors found while reading the pattern.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The regex engine rejected the pattern.
    #[error("invalid pattern: {0}")]
    Syntax(#[from] Box<regex_syntax::Error>),
    /// The regex engine could not compile the pattern.
    #[error("cannot compile pattern: {0}")]
    Build(#[from] Box<regex_automata::meta::BuildError>),
    /// A `)` without a matching `(`.
    #[error("too many close parens: `)` at {position} has no matching `(`")]
    UnmatchedClose {
        /// Byte offset of the `)` in the pattern
        position: usize,
    },
    /// A `(` without a matching `)`.
    #[error("not enough close parens: `(` at {position} is never closed")]
    Unclosed {
        /// Byte offset of the `(` in the pattern
        position: usize,
    },
    /// A character class `[...]` without its closing `]`.
    #[error("unterminated character class starting at {position}")]
    UnterminatedClass {
        /// Byte offset of the `[` in the pattern
        position: usize,
    },
    /// A named group whose name is not a valid identifier.
    #[error("invalid capture group name `{name}` at {position}: names must start with a letter or `_` and contain only letters, digits and `_`")]
    InvalidGroupName {
        /// The name as written in the pattern
        name: String,
        /// Byte offset of the name in the pattern
        position: usize,
    },
    /// The groups found in the pattern are numbered differently than the regex engine numbers them.
    #[error("capture group {index} is `{found}` in the pattern, but the regex engine reports `{expected}`")]
    GroupOrder {
        /// The engine's index of the group
        index: usize,
        /// Name reported by the regex engine
        expected: String,
        /// Name found by scanning the pattern
        found: String,
    },
    /// Unknown letter in an inline-flags string.
    #[error("unknown regex flag `{0}`. Valid flags are: i, m, s, x, U, R")]
    UnknownFlag(char),
}

/// Errors raised while building a plan: the pattern does not fit the target type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlanError {
    /// A numbered group is left over after all constructor slots of a type were filled.
    #[error("capture group `{group}` has no slot left in `{ty}`, which takes {expected} positional values")]
    TooManyGroups {
        /// Name of the target type
        ty: &'static str,
        /// The group that could not be placed
        group: String,
        /// Number of constructor slots of the type
        expected: usize,
    },
    /// The groups ran out before all constructor slots of a type were filled.
    #[error("`{ty}` takes {expected} positional values, but only {found} capture groups are available")]
    NotEnoughGroups {
        /// Name of the target type
        ty: &'static str,
        /// Number of constructor slots of the type
        expected: usize,
        /// Number of groups that were bound
        found: usize,
    },
    /// Groups that are not consumed by the target type at all.
    #[error("`{ty}` does not consume all capture groups of the pattern: {} left over", groups.join(", "))]
    UnconsumedGroups {
        /// Name of the target type
        ty: &'static str,
        /// Names of the left over groups
        groups: Vec<String>,
    },
    /// A named group without a property of that name.
    #[error("could not find a property for the named capture group `{name}` on `{ty}`{}", did_you_mean(.suggestion))]
    MissingProperty {
        /// Name of the target type
        ty: &'static str,
        /// Name of the group
        name: String,
        /// The closest existing property name, if any
        suggestion: Option<&'static str>,
    },
    /// A named group inside a group bound to a tuple. Tuples have no properties.
    #[error("named capture group `{name}` cannot bind to the tuple `{ty}`: tuples have no properties")]
    NamedGroupOnTuple {
        /// Name of the tuple type
        ty: &'static str,
        /// Name of the group
        name: String,
    },
    /// In strict mode, a numbered group that cannot be bound to anything.
    #[error("capture group `{group}` cannot be bound to `{ty}`: it has no positional constructor")]
    UnboundGroup {
        /// Name of the target type
        ty: &'static str,
        /// The group that could not be bound
        group: String,
    },
    /// Several sibling groups repeat together, but the element type cannot hold one of each.
    #[error("the groups inside `{group}` repeat together, so the element type `{ty}` must be a tuple or a record")]
    Lockstep {
        /// Name of the element type
        ty: &'static str,
        /// The group containing the siblings
        group: String,
    },
    /// No constructor takes the number of bound values.
    #[error("`{ty}` has no constructor taking {count} values")]
    MissingConstructor {
        /// Name of the target type
        ty: &'static str,
        /// Number of bound constructor values
        count: usize,
    },
    /// A plan node does not fit the type it was bound to.
    #[error("invalid {strategy} node for `{ty}`: {reason}")]
    InvalidNode {
        /// The strategy of the node
        strategy: crate::Strategy,
        /// Name of the target type
        ty: &'static str,
        /// What is wrong
        reason: &'static str,
    },
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean `{}`?", s),
        None => String::new(),
    }
}

/// Errors raised while running a plan.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The pattern did not match the input.
    #[error("the pattern did not match the input")]
    NoMatch,
    /// A captured text was rejected by the type's conversion.
    #[error("capture group `{group}` with text {text:?} could not be converted to `{ty}`: {source}")]
    Conversion {
        /// Name of the capture group
        group: String,
        /// Name of the target type
        ty: &'static str,
        /// The captured text
        text: String,
        /// Error returned by the conversion
        source: BoxedError,
    },
    /// A group did not participate in the match, and the target type has no value for that.
    #[error("capture group `{group}` did not participate in the match, and `{ty}` has no absent value. Consider wrapping it in an Option")]
    Absent {
        /// Name of the capture group
        group: String,
        /// Name of the target type
        ty: &'static str,
    },
    /// A plan node has fewer children than the type's construction asked for. Indicates a broken
    /// manual [`Extract`](crate::Extract) implementation.
    #[error("`{ty}` asked for value {index}, but the plan only has {available}")]
    MissingElement {
        /// Name of the target type
        ty: &'static str,
        /// Position of the requested value
        index: usize,
        /// Number of values in the plan
        available: usize,
    },
    /// A property name that the type does not know. Indicates a broken manual [`Extract`](crate::Extract) implementation.
    #[error("`{ty}` has no property `{name}`")]
    UnknownProperty {
        /// Name of the target type
        ty: &'static str,
        /// The property name
        name: String,
    },
}

impl ExtractError {
    /// Creates a [`Conversion`](ExtractError::Conversion) error for `T`.
    pub fn conversion<T>(group: &str, text: &str, source: impl Into<BoxedError>) -> Self {
        ExtractError::Conversion {
            group: group.to_string(),
            ty: std::any::type_name::<T>(),
            text: text.to_string(),
            source: source.into(),
        }
    }
}

/// Error used when a text does not name any variant of an enum.
#[derive(Debug, thiserror::Error)]
#[error("unknown variant {text:?}, expected one of: {}", expected.join(", "))]
pub struct UnknownVariantError {
    /// The text that was matched
    pub text: String,
    /// The accepted variant names
    pub expected: &'static [&'static str],
}

//! The `extract!` macro, kept apart from the crate root docs

/// Extracts a value from `input`, building the plan for the pattern only once.
///
/// ## Signature
/// ```ignore
/// extract!(input: impl Deref<Target = str>, pattern: <literal> => Type) -> Result<Type, ExtractError>
/// ```
///
/// The plan is stored in a `lazy_static` at the call site, so every call site builds its plan on
/// first use and reuses it afterwards. Because of that, `Type` cannot use the generic parameters of
/// an enclosing function.
///
/// ## Panics
/// If the pattern is not a valid regex, or does not fit `Type`. Since the pattern is a literal,
/// this always happens on the first call, and never depends on the input.
///
/// ## Examples
/// ```
/// use regextract::extract;
///
/// let lines = ["move 3 from 1 to 2", "move 11 from 2 to 9"];
/// for line in lines {
///     let (count, from, to) = extract!(line, r"move (\d+) from (\d+) to (\d+)" => (usize, u8, u8)).unwrap();
///     assert!(count > 0 && from != to);
/// }
///
/// let owned = String::from("move 1 from 1 to 3");
/// let result = extract!(owned, r"move (\d+) from (\d+) to (\d+)" => (usize, u8, u8));
/// assert_eq!(result.unwrap(), (1, 1, 3));
/// ```
///
/// ```should_panic
/// use regextract::extract;
/// // two groups for three values
/// let _ = extract!("1-2", r"(\d)-(\d)" => (u8, u8, u8));
/// ```
#[macro_export]
macro_rules! extract {
    ($input: expr, $pattern: literal => $ty: ty $(,)?) => {{
        $crate::lazy_static::lazy_static! {
            static ref PLAN: ::std::result::Result<$crate::Plan<$ty>, $crate::Error> =
                $crate::Plan::new($pattern);
        }
        $crate::__macro_utilities::built(&*PLAN, $pattern).extract(&$input)
    }};
}

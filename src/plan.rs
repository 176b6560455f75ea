//! Extraction plans: which capture group builds which part of a value, and how.

use std::fmt;
use std::marker::PhantomData;

use crate::capture_history::Matcher;
use crate::*;

mod builder;
mod execute;

pub use execute::*;

/// How a [`PlanNode`] builds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Parse the captured text, e.g. with [`FromStr`](std::str::FromStr).
    DirectParse,
    /// Pass the captured text to a constructor that takes a string.
    StringConstruct,
    /// Parse the captured text as an enum variant or a combination of flags.
    EnumParse,
    /// Use the captured text as it is.
    StringCast,
    /// Call the type's constructor with the values of the constructor children, then set the
    /// property children.
    ConstructorInvoke,
    /// Build a tuple from the values of the constructor children.
    TupleConstruct,
    /// Build one element per capture of the element's group.
    CollectionInitialize,
    /// Hand everything to the only child. The node's own group has no value of its own.
    VirtualPassthrough,
}

impl Strategy {
    /// `true` for the strategies that build a value from the text of a single capture.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Strategy::DirectParse
                | Strategy::StringConstruct
                | Strategy::EnumParse
                | Strategy::StringCast
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which part of the input a node's value is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The last capture of the node's own group within the parent's span.
    Capture,
    /// The parent's span as it is. Used for collections whose elements are captures of the
    /// collection's own group, and for elements built from several groups repeating together.
    Inherit,
}

/// The capture group a [`PlanNode`] is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupRef {
    name: String,
    index: usize,
}

impl GroupRef {
    /// The name of the group. For numbered groups this is the index as text.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The index of the group in the regex.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl From<&GroupNode> for GroupRef {
    fn from(node: &GroupNode) -> Self {
        Self {
            name: node.name().to_string(),
            index: node.index(),
        }
    }
}

/// A named child of a [`PlanNode`], set after the value is constructed.
#[derive(Debug, Clone)]
pub struct Property {
    name: &'static str,
    node: PlanNode,
}

impl Property {
    /// The name of the property.
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// The plan for the property's value.
    pub fn node(&self) -> &PlanNode {
        &self.node
    }
}

/// One node of an extraction plan: a capture group, the type it builds and how.
///
/// Nodes carry no state of their own, so one plan can run on any number of matches, from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct PlanNode {
    group: GroupRef,
    target: TypeRef,
    strategy: Strategy,
    scope: Scope,
    constructor_children: Vec<PlanNode>,
    property_children: Vec<Property>,
}

impl PlanNode {
    fn new(group: &GroupNode, target: TypeRef, strategy: Strategy) -> Self {
        Self {
            group: group.into(),
            target,
            strategy,
            scope: Scope::Capture,
            constructor_children: vec![],
            property_children: vec![],
        }
    }

    /// The group the node is bound to.
    pub fn group(&self) -> &GroupRef {
        &self.group
    }
    /// The type the node builds.
    pub fn target(&self) -> TypeRef {
        self.target
    }
    /// How the node builds its value.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    /// Which part of the input the node's value is built from.
    pub fn scope(&self) -> Scope {
        self.scope
    }
    /// The nodes that provide the constructor values, in order. For collections, this is the
    /// element. For a pass-through, the node it delegates to.
    pub fn constructor_children(&self) -> &[PlanNode] {
        &self.constructor_children
    }
    /// The nodes that provide property values.
    pub fn property_children(&self) -> &[Property] {
        &self.property_children
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self
            .constructor_children
            .iter()
            .chain(self.property_children.iter().map(|p| &p.node))
            .map(PlanNode::len)
            .sum::<usize>()
    }

    /// Always `false`: a subtree contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        write!(f, "{:indent$}{}", "", label, indent = depth * 2)?;
        write!(
            f,
            "{} {} <- group {}",
            self.strategy,
            self.target.name(),
            self.group.name
        )?;
        if self.scope == Scope::Inherit {
            f.write_str(" (inherit)")?;
        }
        writeln!(f)?;
        for child in &self.constructor_children {
            child.fmt_indented(f, depth + 1, "")?;
        }
        for property in &self.property_children {
            let label = format!("{} = ", property.name);
            property.node.fmt_indented(f, depth + 1, &label)?;
        }
        Ok(())
    }
}

/// Renders the plan tree, one node per line.
///
/// ```
/// # use regextract::*;
/// let plan = Plan::<(u32, Vec<char>)>::new(r"(\d+):(?:(\w),?)+").unwrap();
/// println!("{}", plan.root());
/// # let text = plan.root().to_string();
/// # let strategies: Vec<_> = text.lines().filter_map(|l| l.split_whitespace().next()).collect();
/// # assert_eq!(strategies, ["TupleConstruct", "DirectParse", "CollectionInitialize", "DirectParse"]);
/// ```
/// prints
/// ```text
/// TupleConstruct (u32, alloc::vec::Vec<char>) <- group 0
///   DirectParse u32 <- group 1
///   CollectionInitialize alloc::vec::Vec<char> <- group 2 (inherit)
///     DirectParse char <- group 2
/// ```
impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0, "")
    }
}

/// A reusable extraction plan: a pattern, compiled, and bound to the type `T`.
///
/// Building a plan checks that the pattern fits `T`. Running it can then only fail if the input
/// does not match, or if a captured text cannot be converted.
///
/// ```
/// # use regextract::*;
/// let plan = Plan::<(String, Vec<u32>)>::new(r"(\w+): (?:(\d+) ?)+").unwrap();
///
/// let (name, values) = plan.extract("primes: 2 3 5 7").unwrap();
/// assert_eq!(name, "primes");
/// assert_eq!(values, [2, 3, 5, 7]);
///
/// assert!(plan.try_extract("no numbers").is_none());
/// ```
pub struct Plan<T> {
    tree: GroupTree,
    matcher: Matcher,
    root: PlanNode,
    options: ExtractOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Extract> Plan<T> {
    /// Builds a plan for `pattern` with the default [`ExtractOptions`].
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Self::with_options(pattern, ExtractOptions::default())
    }

    /// Builds a plan for `pattern` with the given options.
    pub fn with_options(pattern: &str, options: ExtractOptions) -> Result<Self, Error> {
        Self::with_cache(pattern, options, ShapeCache::global())
    }

    /// Builds a plan, looking up type shapes in `cache` instead of the global cache.
    #[tracing::instrument(level = "debug", skip_all, fields(pattern = %pattern))]
    pub fn with_cache(
        pattern: &str,
        options: ExtractOptions,
        cache: &ShapeCache,
    ) -> Result<Self, Error> {
        let hir = options
            .parser()
            .parse(pattern)
            .map_err(|err| PatternError::Syntax(Box::new(err)))?;
        let matcher = Matcher::new(&hir)?;

        let tree = GroupTree::with_verbose(pattern, options.ignore_whitespace)?;
        tree.check_order(matcher.names())?;

        let builder = builder::Builder::new(cache, options.strict);
        let root = builder.build(tree.root(), TypeRef::of::<T>())?;
        tracing::debug!(
            ty = std::any::type_name::<T>(),
            nodes = root.len(),
            "built extraction plan"
        );

        Ok(Self {
            tree,
            matcher,
            root,
            options,
            _marker: PhantomData,
        })
    }

    /// Builds a plan for the pattern of an already compiled [`regex::Regex`].
    ///
    /// The flags the regex was built with are not available, so inline flags like `(?i)` have to
    /// be part of the pattern itself.
    pub fn from_regex(regex: &regex::Regex) -> Result<Self, Error> {
        Self::new(regex.as_str())
    }

    /// Matches `input` and builds a value from the match.
    pub fn extract(&self, input: &str) -> Result<T, ExtractError> {
        let history = self.captures(input).ok_or(ExtractError::NoMatch)?;
        self.execute(&history)
    }

    /// Like [`extract`](Plan::extract), but returns `None` on any error.
    pub fn try_extract(&self, input: &str) -> Option<T> {
        self.extract(input).ok()
    }

    /// Matches `input` and returns all captures, or `None` if it does not match.
    pub fn captures<'h>(&self, input: &'h str) -> Option<CaptureHistory<'h>> {
        let history = self.matcher.captures(input);
        if history.is_none() {
            tracing::debug!(pattern = self.tree.pattern(), "input does not match");
        }
        history
    }

    /// Builds a value from a match of this plan's pattern.
    pub fn execute(&self, history: &CaptureHistory<'_>) -> Result<T, ExtractError> {
        let whole = Span::new(0, history.haystack().len());
        Execution::new(history).execute(&self.root, whole)
    }

    /// The root of the plan tree.
    pub fn root(&self) -> &PlanNode {
        &self.root
    }

    /// The capture groups of the pattern.
    pub fn tree(&self) -> &GroupTree {
        &self.tree
    }

    /// The pattern.
    pub fn pattern(&self) -> &str {
        self.tree.pattern()
    }

    /// The options the plan was built with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }
}

impl<T: DefaultPattern> Plan<T> {
    /// Builds a plan from the type's [`DefaultPattern`].
    pub fn from_default() -> Result<Self, Error> {
        Self::with_options(T::PATTERN, T::options())
    }
}

impl<T> fmt::Debug for Plan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("pattern", &self.tree.pattern())
            .field("target", &std::any::type_name::<T>())
            .field("options", &self.options)
            .finish()
    }
}

impl<T> fmt::Display for Plan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.tree.pattern())?;
        fmt::Display::fmt(&self.root, f)
    }
}

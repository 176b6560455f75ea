//! Structural description of target types.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::{Extract, Strategy};

/// A handle to a type that implements [`Extract`], usable without naming the type.
///
/// Two handles are equal if they refer to the same type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: fn() -> TypeId,
    name: fn() -> &'static str,
    shape: fn() -> Shape,
    spread: fn() -> Option<Vec<TypeRef>>,
}

impl TypeRef {
    /// The handle for `T`.
    pub fn of<T: Extract>() -> Self {
        Self {
            id: TypeId::of::<T>,
            name: std::any::type_name::<T>,
            shape: T::shape,
            spread: T::spread,
        }
    }
    /// The [`TypeId`] of the type.
    pub fn id(&self) -> TypeId {
        (self.id)()
    }
    /// The name of the type, as given by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        (self.name)()
    }
    /// The [`Shape`] of the type. Not cached, see [`ShapeCache`] for that.
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }
    pub(crate) fn spread(&self) -> Option<Vec<TypeRef>> {
        (self.spread)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a type is built from captured text, or from its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Built directly from the text of a single capture.
    Leaf(LeafKind),
    /// An optional wrapper around another type, like [`Option`].
    Nullable(TypeRef),
    /// A fixed sequence of elements. Elements wrapped in [`Rest`](crate::Rest) are already flattened
    /// into this list.
    Tuple(Vec<TypeRef>),
    /// A collection with one element per capture.
    Collection(TypeRef),
    /// A struct with a constructor and named properties.
    Record(RecordShape),
}

impl Shape {
    /// `true` for tuples and records, which are built from several groups.
    pub fn is_compound(&self) -> bool {
        matches!(self, Shape::Tuple(_) | Shape::Record(_))
    }
}

/// The ways a [`Shape::Leaf`] type turns text into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// A parse function, usually [`FromStr`](std::str::FromStr).
    Parse,
    /// A constructor that takes a string.
    StringConstruct,
    /// The name of an enum variant, or a combination of flags.
    Enum,
    /// The text itself.
    Text,
}

impl From<LeafKind> for Strategy {
    fn from(kind: LeafKind) -> Self {
        match kind {
            LeafKind::Parse => Strategy::DirectParse,
            LeafKind::StringConstruct => Strategy::StringConstruct,
            LeafKind::Enum => Strategy::EnumParse,
            LeafKind::Text => Strategy::StringCast,
        }
    }
}

/// A named, typed part of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name of the field
    pub name: &'static str,
    /// Type of the field
    pub ty: TypeRef,
}

impl Field {
    /// Creates a field of type `T`.
    pub fn new<T: Extract>(name: &'static str) -> Self {
        Self {
            name,
            ty: TypeRef::of::<T>(),
        }
    }
}

/// The constructor and properties of a [`Shape::Record`].
///
/// A record has one positional constructor taking `params`, in order. If the record is also
/// constructible by name, a value can be created with no positional values at all and then filled
/// in property by property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    params: Vec<Field>,
    properties: Vec<Field>,
    by_name: bool,
}

impl RecordShape {
    /// A record with a positional constructor and no settable properties.
    pub fn positional(params: Vec<Field>) -> Self {
        Self {
            params,
            properties: vec![],
            by_name: false,
        }
    }
    /// A record whose constructor takes `params` and which can be filled in by the names of
    /// `properties`.
    pub fn named(params: Vec<Field>, properties: Vec<Field>) -> Self {
        Self {
            params,
            properties,
            by_name: true,
        }
    }
    /// The parameters of the positional constructor.
    pub fn params(&self) -> &[Field] {
        &self.params
    }
    /// The settable properties.
    pub fn properties(&self) -> &[Field] {
        &self.properties
    }
    /// The property named `name`.
    pub fn property(&self, name: &str) -> Option<&Field> {
        self.properties.iter().find(|field| field.name == name)
    }
    /// `true` if the record can be created without positional values and filled in by name.
    pub fn by_name(&self) -> bool {
        self.by_name
    }
    /// The number of positional values each of the record's constructors takes.
    pub fn constructor_arities(&self) -> Vec<usize> {
        let mut arities = vec![self.params.len()];
        if self.by_name && !self.params.is_empty() {
            arities.push(0);
        }
        arities
    }
}

/// What is known about a type, computed once per type.
#[derive(Debug)]
pub struct TypeFacts {
    ty: TypeRef,
    shape: Shape,
    arity: Option<usize>,
}

impl TypeFacts {
    /// The type these facts are about.
    pub fn ty(&self) -> TypeRef {
        self.ty
    }
    /// Name of the type.
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }
    /// The shape of the type.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    /// The number of capture slots the type consumes when bound. `None` for types that contain
    /// themselves.
    ///
    /// - a leaf takes 1
    /// - a nullable type takes as many as its inner type
    /// - a collection takes as many as its element, plus 1 if the element is a collection itself
    /// - a tuple or record takes 1 plus the sum of its constructor parameters
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL: ShapeCache = ShapeCache::new();
}

/// Memoizes [`TypeFacts`] per type.
///
/// Safe to share between threads. Two threads asking for an unknown type at the same time may both
/// compute its facts, but only one result is kept and both results are equal.
///
/// ```
/// # use regextract::*;
/// let cache = ShapeCache::new();
/// let facts = cache.facts(TypeRef::of::<(u8, Option<String>)>());
/// assert_eq!(facts.arity(), Some(3));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ShapeCache {
    facts: DashMap<TypeId, Arc<TypeFacts>>,
}

impl ShapeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache used by [`Plan::new`](crate::Plan::new) and the other constructors that don't
    /// take a cache.
    pub fn global() -> &'static ShapeCache {
        &GLOBAL
    }

    /// Number of types in the cache.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// `true` if no type was looked up yet.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// The facts about `ty`, computed on first use.
    pub fn facts(&self, ty: TypeRef) -> Arc<TypeFacts> {
        if let Some(facts) = self.facts.get(&ty.id()) {
            return Arc::clone(facts.value());
        }
        let shape = ty.shape();
        let mut visiting = vec![ty.id()];
        let arity = self.arity_of(&shape, &mut visiting);
        let facts = Arc::new(TypeFacts { ty, shape, arity });

        // no guard is held while computing, since that may look up other types
        let entry = self.facts.entry(ty.id()).or_insert(facts);
        Arc::clone(entry.value())
    }

    fn arity(&self, ty: TypeRef, visiting: &mut Vec<TypeId>) -> Option<usize> {
        if let Some(facts) = self.facts.get(&ty.id()) {
            return facts.arity;
        }
        if visiting.contains(&ty.id()) {
            return None;
        }
        visiting.push(ty.id());
        let arity = self.arity_of(&ty.shape(), visiting);
        visiting.pop();
        arity
    }

    fn arity_of(&self, shape: &Shape, visiting: &mut Vec<TypeId>) -> Option<usize> {
        match shape {
            Shape::Leaf(_) => Some(1),
            Shape::Nullable(inner) => self.arity(*inner, visiting),
            Shape::Collection(element) => {
                let arity = self.arity(*element, visiting)?;
                match element.shape() {
                    Shape::Collection(_) => Some(arity + 1),
                    _ => Some(arity),
                }
            }
            Shape::Tuple(elements) => self.compound_arity(elements.iter().copied(), visiting),
            Shape::Record(record) => {
                self.compound_arity(record.params.iter().map(|field| field.ty), visiting)
            }
        }
    }

    fn compound_arity(
        &self,
        params: impl Iterator<Item = TypeRef>,
        visiting: &mut Vec<TypeId>,
    ) -> Option<usize> {
        let mut sum = 0;
        for param in params {
            sum += self.arity(param, visiting)?;
        }
        Some(sum + 1)
    }
}

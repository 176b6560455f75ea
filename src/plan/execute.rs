use std::str::FromStr;

use tracing::trace;

use super::*;

/// Runs plan nodes against one match.
///
/// Passed to [`Extract::construct`], which uses it to read the captured text, or to build the
/// values of child nodes.
#[derive(Debug, Clone, Copy)]
pub struct Execution<'a> {
    history: &'a CaptureHistory<'a>,
}

impl<'a> Execution<'a> {
    /// Creates an execution over the captures of one match.
    pub fn new(history: &'a CaptureHistory<'a>) -> Self {
        Self { history }
    }

    /// The captures of the match.
    pub fn history(&self) -> &'a CaptureHistory<'a> {
        self.history
    }

    /// The input text within `span`.
    pub fn text(&self, span: Span) -> &'a str {
        self.history.text(span)
    }

    /// Builds the value of `node` within the span of its parent.
    ///
    /// A node with [`Scope::Capture`] uses the last capture of its group within `parent`. If the
    /// group has no capture there, the value is the type's [`absent`](Extract::absent) value.
    pub fn execute<T: Extract>(&self, node: &PlanNode, parent: Span) -> Result<T, ExtractError> {
        if node.strategy == Strategy::VirtualPassthrough {
            return self.execute(self.delegate(node)?, parent);
        }
        match node.scope {
            Scope::Inherit => self.construct(node, parent),
            Scope::Capture => match self.history.last_within(node.group.index, parent) {
                Some(span) => self.construct(node, span),
                None => T::absent().ok_or_else(|| ExtractError::Absent {
                    group: node.group.name.clone(),
                    ty: std::any::type_name::<T>(),
                }),
            },
        }
    }

    /// Parses the text within `span` with [`FromStr`].
    pub fn parse<T>(&self, node: &PlanNode, span: Span) -> Result<T, ExtractError>
    where
        T: FromStr,
        T::Err: Into<BoxedError>,
    {
        let text = self.text(span);
        text.parse()
            .map_err(|err| ExtractError::conversion::<T>(&node.group.name, text, err))
    }

    /// Builds a collection for a [`Strategy::CollectionInitialize`] node.
    pub fn collect<C, E>(&self, node: &PlanNode, span: Span) -> Result<C, ExtractError>
    where
        C: FromIterator<E>,
        E: Extract,
    {
        let element = node
            .constructor_children
            .first()
            .ok_or_else(|| ExtractError::MissingElement {
                ty: std::any::type_name::<C>(),
                index: 0,
                available: 0,
            })?;

        match element.scope {
            Scope::Capture => self
                .history
                .within(element.group.index, span)
                .map(|capture| self.element::<E>(element, capture))
                .collect(),
            Scope::Inherit => self
                .rounds(element, span)
                .into_iter()
                .map(|round| self.construct::<E>(element, round))
                .collect(),
        }
    }

    fn construct<T: Extract>(&self, node: &PlanNode, span: Span) -> Result<T, ExtractError> {
        trace!(
            strategy = %node.strategy,
            group = node.group.name.as_str(),
            start = span.start,
            end = span.end,
            "constructing"
        );
        T::construct(node, self, span)
    }

    /// Builds one element from one capture of the element's group.
    fn element<E: Extract>(&self, node: &PlanNode, capture: Span) -> Result<E, ExtractError> {
        if node.strategy == Strategy::VirtualPassthrough {
            self.execute(self.delegate(node)?, capture)
        } else {
            self.construct(node, capture)
        }
    }

    fn delegate<'n>(&self, node: &'n PlanNode) -> Result<&'n PlanNode, ExtractError> {
        node.constructor_children
            .first()
            .ok_or_else(|| ExtractError::MissingElement {
                ty: node.target.name(),
                index: 0,
                available: 0,
            })
    }

    /// Splits `span` into the rounds of a group of siblings that repeat together: one round per
    /// iteration of the innermost repetition around them. A sibling that did not match in an
    /// iteration has no capture in that round.
    fn rounds(&self, element: &PlanNode, span: Span) -> Vec<Span> {
        let groups: Vec<usize> = element
            .constructor_children
            .iter()
            .chain(element.property_children.iter().map(|p| &p.node))
            .filter(|child| child.scope == Scope::Capture)
            .map(|child| child.group.index)
            .collect();

        match self.history.iterations(&groups, span) {
            Some(iterations) => iterations.collect(),
            // siblings outside of any repetition match at most once
            None if groups
                .iter()
                .any(|&group| self.history.last_within(group, span).is_some()) =>
            {
                vec![span]
            }
            None => vec![],
        }
    }
}

/// The constructor values of a tuple node, in order.
#[derive(Debug)]
pub struct Elements<'n, 'a> {
    node: &'n PlanNode,
    cx: &'n Execution<'a>,
    span: Span,
    next: usize,
}

impl<'n, 'a> Elements<'n, 'a> {
    /// Creates the elements of `node`, which was given `span`.
    pub fn new(node: &'n PlanNode, cx: &'n Execution<'a>, span: Span) -> Self {
        Self {
            node,
            cx,
            span,
            next: 0,
        }
    }

    /// Builds the next element.
    pub fn next_value<T: Extract>(&mut self) -> Result<T, ExtractError> {
        let children = &self.node.constructor_children;
        let child = children
            .get(self.next)
            .ok_or_else(|| ExtractError::MissingElement {
                ty: self.node.target.name(),
                index: self.next,
                available: children.len(),
            })?;
        self.next += 1;
        self.cx.execute(child, self.span)
    }
}

/// Access to the values of a record node. Used by `#[derive(Extract)]`.
///
/// A record is built either from its constructor values, or, if there are none, from the absent
/// values of its fields. Afterwards, the properties are set.
#[derive(Debug)]
pub struct Fields<'n, 'a> {
    elements: Elements<'n, 'a>,
}

impl<'n, 'a> Fields<'n, 'a> {
    /// Creates the fields of `node`, which was given `span`.
    pub fn new(node: &'n PlanNode, cx: &'n Execution<'a>, span: Span) -> Self {
        Self {
            elements: Elements::new(node, cx, span),
        }
    }

    /// `true` if the constructor values are bound, `false` if the record is built by name.
    pub fn is_positional(&self) -> bool {
        !self.elements.node.constructor_children.is_empty()
    }

    /// Builds the next constructor value.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: Extract>(&mut self) -> Result<T, ExtractError> {
        self.elements.next_value()
    }

    /// The value of a field that is not bound to any group.
    pub fn absent<T: Extract>(&self) -> Result<T, ExtractError> {
        T::absent().ok_or_else(|| ExtractError::Absent {
            group: self.elements.node.group.name.clone(),
            ty: std::any::type_name::<T>(),
        })
    }

    /// The bound properties, in the order of their groups.
    pub fn properties(&self) -> impl Iterator<Item = PropertyValue<'n, 'a>> + '_ {
        let Elements { node, cx, span, .. } = self.elements;
        node.property_children.iter().map(move |property| PropertyValue {
            owner: node,
            property,
            cx,
            span,
        })
    }
}

/// One bound property of a record. See [`Fields`].
#[derive(Debug)]
pub struct PropertyValue<'n, 'a> {
    owner: &'n PlanNode,
    property: &'n Property,
    cx: &'n Execution<'a>,
    span: Span,
}

impl<'n, 'a> PropertyValue<'n, 'a> {
    /// The name of the property.
    pub fn name(&self) -> &'static str {
        self.property.name
    }

    /// Builds the value of the property.
    pub fn value<T: Extract>(&self) -> Result<T, ExtractError> {
        self.cx.execute(&self.property.node, self.span)
    }

    /// The error for a property that the record does not have.
    pub fn unknown(&self) -> ExtractError {
        ExtractError::UnknownProperty {
            ty: self.owner.target.name(),
            name: self.property.name.to_string(),
        }
    }
}

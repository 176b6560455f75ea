use std::collections::VecDeque;

use tracing::trace;

use super::*;

/// Where a group is being bound. Decides whether a group with a single child can hand its value
/// to that child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// The whole pattern
    Root,
    /// The anchor of a collection element
    Element,
    /// A named group bound to a property
    Property,
    /// A positional value of a tuple or constructor
    Slot,
}

impl Context {
    /// Outside of slots, nothing else can consume a nested group, so a group with one child can
    /// delegate to it.
    fn allows_passthrough(self) -> bool {
        !matches!(self, Context::Slot)
    }
}

/// The node built for a group, and the nested groups it did not use.
///
/// Leftovers are offered to the following positional slots of the enclosing compound.
struct Bound<'t> {
    node: PlanNode,
    leftovers: Vec<&'t GroupNode>,
}

impl<'t> Bound<'t> {
    fn new(node: PlanNode) -> Self {
        Self {
            node,
            leftovers: vec![],
        }
    }
}

pub(crate) struct Builder<'c> {
    cache: &'c ShapeCache,
    strict: bool,
}

impl<'c> Builder<'c> {
    pub(crate) fn new(cache: &'c ShapeCache, strict: bool) -> Self {
        Self { cache, strict }
    }

    /// Binds the whole group tree to `ty`.
    pub(crate) fn build(&self, root: &GroupNode, ty: TypeRef) -> Result<PlanNode, PlanError> {
        let bound = self.assign(root, ty, Context::Root)?;
        if !bound.leftovers.is_empty() {
            return Err(PlanError::UnconsumedGroups {
                ty: ty.name(),
                groups: bound
                    .leftovers
                    .iter()
                    .map(|group| group.name().to_string())
                    .collect(),
            });
        }
        Ok(bound.node)
    }

    fn assign<'t>(
        &self,
        group: &'t GroupNode,
        ty: TypeRef,
        context: Context,
    ) -> Result<Bound<'t>, PlanError> {
        let facts = self.cache.facts(ty);
        let bound = match facts.shape() {
            Shape::Nullable(inner) => {
                // the inner node builds the value, the wrapper only changes what absence means
                let mut bound = self.assign(group, *inner, context)?;
                bound.node.target = ty;
                return Ok(bound);
            }
            Shape::Leaf(kind) => self.leaf(group, ty, *kind, context)?,
            Shape::Collection(element) => self.collection(group, ty, *element)?,
            Shape::Tuple(elements) => self.compound(group, &facts, elements.clone(), None, context)?,
            Shape::Record(record) => {
                let params = record.params().iter().map(|field| field.ty).collect();
                self.compound(group, &facts, params, Some(record), context)?
            }
        };
        trace!(
            group = group.name(),
            ty = ty.name(),
            strategy = %bound.node.strategy,
            "bound group"
        );
        validate(&bound.node, &facts)?;
        Ok(bound)
    }

    fn leaf<'t>(
        &self,
        group: &'t GroupNode,
        ty: TypeRef,
        kind: LeafKind,
        context: Context,
    ) -> Result<Bound<'t>, PlanError> {
        match group.children() {
            [] => Ok(Bound::new(PlanNode::new(group, ty, kind.into()))),
            [child] if context.allows_passthrough() => self.passthrough(group, child, ty, context),
            children => Ok(Bound {
                node: PlanNode::new(group, ty, kind.into()),
                leftovers: children.iter().collect(),
            }),
        }
    }

    fn passthrough<'t>(
        &self,
        group: &'t GroupNode,
        child: &'t GroupNode,
        ty: TypeRef,
        context: Context,
    ) -> Result<Bound<'t>, PlanError> {
        let inner = self.assign(child, ty, context)?;
        let mut node = PlanNode::new(group, ty, Strategy::VirtualPassthrough);
        node.constructor_children.push(inner.node);
        Ok(Bound {
            node,
            leftovers: inner.leftovers,
        })
    }

    fn collection<'t>(
        &self,
        group: &'t GroupNode,
        ty: TypeRef,
        element: TypeRef,
    ) -> Result<Bound<'t>, PlanError> {
        let element_facts = self.cache.facts(element);
        let compound_element = match element_facts.shape() {
            Shape::Nullable(inner) => inner.shape().is_compound(),
            shape => shape.is_compound(),
        };

        let (element, scope, leftovers) = match group.children() {
            // each capture of the group itself is an element
            [] => {
                let bound = self.assign(group, element, Context::Element)?;
                (bound.node, Scope::Inherit, bound.leftovers)
            }
            // each capture of the child is an element
            [child] if !(child.is_named() && compound_element) => {
                let bound = self.assign(child, element, Context::Element)?;
                (bound.node, Scope::Capture, bound.leftovers)
            }
            // the children repeat together, and each round of them is an element
            _ => {
                if !compound_element {
                    return Err(PlanError::Lockstep {
                        ty: element.name(),
                        group: group.name().to_string(),
                    });
                }
                let mut bound = self.assign(group, element, Context::Slot)?;
                bound.node.scope = Scope::Inherit;
                (bound.node, Scope::Capture, bound.leftovers)
            }
        };

        let mut node = PlanNode::new(group, ty, Strategy::CollectionInitialize);
        node.scope = scope;
        node.constructor_children.push(element);
        Ok(Bound { node, leftovers })
    }

    fn compound<'t>(
        &self,
        group: &'t GroupNode,
        facts: &TypeFacts,
        params: Vec<TypeRef>,
        record: Option<&RecordShape>,
        context: Context,
    ) -> Result<Bound<'t>, PlanError> {
        let ty = facts.ty();
        let children = group.children();

        if let [child] = children {
            if context.allows_passthrough() && facts.arity() == Some(1) && !child.is_named() {
                return self.passthrough(group, child, ty, context);
            }
        }

        let positional = !params.is_empty() && children.iter().any(|child| !child.is_named());
        if record.is_none() && !params.is_empty() && !positional {
            return Err(PlanError::NotEnoughGroups {
                ty: ty.name(),
                expected: params.len(),
                found: 0,
            });
        }

        let strategy = match record {
            Some(_) => Strategy::ConstructorInvoke,
            None => Strategy::TupleConstruct,
        };
        let mut node = PlanNode::new(group, ty, strategy);
        let mut queue: VecDeque<&GroupNode> = children.iter().collect();

        while let Some(child) = queue.pop_front() {
            if child.is_named() {
                let record = record.ok_or_else(|| PlanError::NamedGroupOnTuple {
                    ty: ty.name(),
                    name: child.name().to_string(),
                })?;
                let field = record.property(child.name()).ok_or_else(|| {
                    PlanError::MissingProperty {
                        ty: ty.name(),
                        name: child.name().to_string(),
                        suggestion: closest(child.name(), record.properties()),
                    }
                })?;
                let bound = self.assign(child, field.ty, Context::Property)?;
                node.property_children.push(Property {
                    name: field.name,
                    node: bound.node,
                });
                push_front(&mut queue, bound.leftovers);
            } else if positional && node.constructor_children.len() < params.len() {
                let param = params[node.constructor_children.len()];
                let bound = self.assign(child, param, Context::Slot)?;
                node.constructor_children.push(bound.node);
                push_front(&mut queue, bound.leftovers);
            } else if positional {
                return Err(PlanError::TooManyGroups {
                    ty: ty.name(),
                    group: child.name().to_string(),
                    expected: params.len(),
                });
            } else if self.strict {
                return Err(PlanError::UnboundGroup {
                    ty: ty.name(),
                    group: child.name().to_string(),
                });
            } else {
                trace!(group = child.name(), ty = ty.name(), "looking through group");
                push_front(&mut queue, child.children().iter().collect());
            }
        }

        if positional && node.constructor_children.len() < params.len() {
            return Err(PlanError::NotEnoughGroups {
                ty: ty.name(),
                expected: params.len(),
                found: node.constructor_children.len(),
            });
        }
        Ok(Bound::new(node))
    }
}

/// Puts `groups` at the front of `queue`, keeping their order.
fn push_front<'t>(queue: &mut VecDeque<&'t GroupNode>, groups: Vec<&'t GroupNode>) {
    for group in groups.into_iter().rev() {
        queue.push_front(group);
    }
}

/// The property name closest to `name`, if any is close enough.
fn closest(name: &str, properties: &[Field]) -> Option<&'static str> {
    let mut best = None;
    let mut best_score = 0.8;
    for property in properties {
        let score = strsim::jaro_winkler(name, property.name);
        if score > best_score {
            best_score = score;
            best = Some(property.name);
        }
    }
    best
}

/// Checks that a freshly bound node can actually build its type.
fn validate(node: &PlanNode, facts: &TypeFacts) -> Result<(), PlanError> {
    let invalid = |reason| PlanError::InvalidNode {
        strategy: node.strategy,
        ty: facts.name(),
        reason,
    };
    let values = node.constructor_children.len();
    let properties = node.property_children.len();

    match node.strategy {
        strategy if strategy.is_leaf() => {
            if values + properties > 0 {
                return Err(invalid("a value built from text has no child values"));
            }
        }
        Strategy::VirtualPassthrough => {
            if values != 1 || properties > 0 {
                return Err(invalid("a pass-through needs exactly one child"));
            }
        }
        Strategy::TupleConstruct => match facts.shape() {
            Shape::Tuple(elements) if elements.len() == values && properties == 0 => {}
            Shape::Tuple(_) => return Err(invalid("every tuple element needs exactly one value")),
            _ => return Err(invalid("the type is not a tuple")),
        },
        Strategy::ConstructorInvoke => match facts.shape() {
            Shape::Record(record) => {
                let matching = record
                    .constructor_arities()
                    .into_iter()
                    .filter(|&arity| arity == values)
                    .count();
                if matching != 1 {
                    return Err(PlanError::MissingConstructor {
                        ty: facts.name(),
                        count: values,
                    });
                }
            }
            _ => return Err(invalid("the type is not a record")),
        },
        Strategy::CollectionInitialize => match facts.shape() {
            Shape::Collection(_) if values == 1 && properties == 0 => {}
            Shape::Collection(_) => return Err(invalid("a collection needs exactly one element")),
            _ => return Err(invalid("the type is not a collection")),
        },
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan<T: Extract>(pattern: &str) -> Result<PlanNode, PlanError> {
        let tree = GroupTree::new(pattern).unwrap();
        Builder::new(&ShapeCache::new(), false).build(tree.root(), TypeRef::of::<T>())
    }

    fn strict<T: Extract>(pattern: &str) -> Result<PlanNode, PlanError> {
        let tree = GroupTree::new(pattern).unwrap();
        Builder::new(&ShapeCache::new(), true).build(tree.root(), TypeRef::of::<T>())
    }

    fn strategies(node: &PlanNode) -> Vec<(String, Strategy)> {
        let mut out = vec![(node.group().name().to_string(), node.strategy())];
        for child in node.constructor_children() {
            out.extend(strategies(child));
        }
        for property in node.property_children() {
            out.extend(strategies(property.node()));
        }
        out
    }

    fn s(group: &str, strategy: Strategy) -> (String, Strategy) {
        (group.to_string(), strategy)
    }

    use Strategy::*;

    #[test]
    fn flat_tuple() {
        let node = plan::<(u32, u32)>(r"(\d+)-(\d+)").unwrap();
        assert_eq!(
            strategies(&node),
            [s("0", TupleConstruct), s("1", DirectParse), s("2", DirectParse)]
        );
    }

    #[test]
    fn nested_tuple() {
        let node = plan::<((u32, u32), char, String)>(r"((\d+)-(\d+)) (\w): (.*)").unwrap();
        assert_eq!(
            strategies(&node),
            [
                s("0", TupleConstruct),
                s("1", TupleConstruct),
                s("2", DirectParse),
                s("3", DirectParse),
                s("4", DirectParse),
                s("5", StringCast),
            ]
        );
    }

    #[test]
    fn nested_groups_flatten_into_slots() {
        let node = plan::<(String, u32, u32)>(r"((\d+)-(\d+))").unwrap();
        assert_eq!(
            strategies(&node),
            [
                s("0", TupleConstruct),
                s("1", StringCast),
                s("2", DirectParse),
                s("3", DirectParse),
            ]
        );
    }

    #[test]
    fn root_passthrough() {
        let node = plan::<u32>(r"x(\d+)").unwrap();
        assert_eq!(strategies(&node), [s("0", VirtualPassthrough), s("1", DirectParse)]);

        let node = plan::<u32>(r"\d+").unwrap();
        assert_eq!(strategies(&node), [s("0", DirectParse)]);
    }

    #[test]
    fn nullable_keeps_inner_strategy() {
        let node = plan::<(Option<u32>, String)>(r"(\d+)|(.*)").unwrap();
        assert_eq!(node.constructor_children()[0].strategy(), DirectParse);
        assert_eq!(
            node.constructor_children()[0].target(),
            TypeRef::of::<Option<u32>>()
        );
    }

    #[test]
    fn collections() {
        let node = plan::<Vec<u32>>(r"(?:(\d+) ?)+").unwrap();
        assert_eq!(strategies(&node), [s("0", CollectionInitialize), s("1", DirectParse)]);
        assert_eq!(node.scope(), Scope::Capture);

        let node = plan::<(Vec<u32>,)>(r"(?:(\d+) ?)+").unwrap();
        let collection = &node.constructor_children()[0];
        assert_eq!(collection.strategy(), CollectionInitialize);
        assert_eq!(collection.scope(), Scope::Inherit);
        assert_eq!(collection.constructor_children()[0].group().name(), "1");
    }

    #[test]
    fn nested_collections() {
        let node = plan::<Vec<Vec<u32>>>(r"(?:\[((?:(\d+),?)*)\])+").unwrap();
        assert_eq!(
            strategies(&node),
            [
                s("0", CollectionInitialize),
                s("1", CollectionInitialize),
                s("2", DirectParse)
            ]
        );
    }

    #[test]
    fn lockstep_collection() {
        let node = plan::<Vec<(String, u32)>>(r"(?:(\w+)=(\d+),?)+").unwrap();
        let element = &node.constructor_children()[0];
        assert_eq!(element.strategy(), TupleConstruct);
        assert_eq!(element.scope(), Scope::Inherit);
        assert_eq!(element.constructor_children().len(), 2);

        let err = plan::<Vec<u32>>(r"(?:(\w+)=(\d+),?)+").unwrap_err();
        assert!(matches!(err, PlanError::Lockstep { .. }));
    }

    #[test]
    fn arity_mismatch() {
        let err = plan::<(u32, u32, u32)>(r"(\d+)-(\d+)").unwrap_err();
        assert!(matches!(
            err,
            PlanError::NotEnoughGroups {
                expected: 3,
                found: 2,
                ..
            }
        ));

        let err = plan::<(u32,)>(r"(\d+)-(\d+)").unwrap_err();
        assert!(matches!(err, PlanError::TooManyGroups { expected: 1, .. }));

        let err = plan::<(u32, u32)>(r"\d+").unwrap_err();
        assert!(matches!(err, PlanError::NotEnoughGroups { found: 0, .. }));

        let err = plan::<String>(r"(a)(b)").unwrap_err();
        assert!(matches!(err, PlanError::UnconsumedGroups { .. }));
    }

    #[test]
    fn named_groups_on_tuples() {
        let err = plan::<(u32, u32)>(r"(?<a>\d+)-(\d+)").unwrap_err();
        assert!(matches!(err, PlanError::NamedGroupOnTuple { .. }));
    }

    struct Pair {
        left: u32,
        right: u32,
    }

    impl Extract for Pair {
        fn shape() -> Shape {
            Shape::Record(RecordShape::named(
                vec![Field::new::<u32>("left"), Field::new::<u32>("right")],
                vec![Field::new::<u32>("left"), Field::new::<u32>("right")],
            ))
        }
        fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
            let mut fields = Fields::new(node, cx, span);
            let mut value = if fields.is_positional() {
                Pair {
                    left: fields.next()?,
                    right: fields.next()?,
                }
            } else {
                Pair {
                    left: fields.absent()?,
                    right: fields.absent()?,
                }
            };
            for property in fields.properties() {
                match property.name() {
                    "left" => value.left = property.value()?,
                    "right" => value.right = property.value()?,
                    _ => return Err(property.unknown()),
                }
            }
            Ok(value)
        }
    }

    #[test]
    fn record_by_name() {
        let node = plan::<Pair>(r"(?<left>\d+)-(?<right>\d+)").unwrap();
        assert_eq!(node.strategy(), ConstructorInvoke);
        assert!(node.constructor_children().is_empty());
        let names: Vec<_> = node.property_children().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["left", "right"]);
    }

    #[test]
    fn record_positional() {
        let node = plan::<Pair>(r"(\d+)-(\d+)").unwrap();
        assert_eq!(node.constructor_children().len(), 2);
        assert!(node.property_children().is_empty());
    }

    #[test]
    fn record_positional_then_named() {
        let node = plan::<Pair>(r"(\d+)-(\d+) (?<right>\d+)").unwrap();
        assert_eq!(node.constructor_children().len(), 2);
        assert_eq!(node.property_children()[0].name(), "right");
    }

    #[test]
    fn missing_property_suggestion() {
        let err = plan::<Pair>(r"(?<lefft>\d+)").unwrap_err();
        match err {
            PlanError::MissingProperty {
                name, suggestion, ..
            } => {
                assert_eq!(name, "lefft");
                assert_eq!(suggestion, Some("left"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        let err = plan::<Pair>(r"(?<xyz>\d+)").unwrap_err();
        assert!(matches!(
            err,
            PlanError::MissingProperty {
                suggestion: None,
                ..
            }
        ));
    }

    struct Named {
        value: u32,
    }

    impl Extract for Named {
        fn shape() -> Shape {
            Shape::Record(RecordShape::named(vec![], vec![Field::new::<u32>("value")]))
        }
        fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
            let mut value = Named { value: 0 };
            for property in Fields::new(node, cx, span).properties() {
                match property.name() {
                    "value" => value.value = property.value()?,
                    _ => return Err(property.unknown()),
                }
            }
            Ok(value)
        }
    }

    #[test]
    fn strict_mode() {
        let pattern = r"(\w+) (?<value>\d+) (x)";
        let node = plan::<Named>(pattern).unwrap();
        assert_eq!(node.property_children().len(), 1);

        let err = strict::<Named>(pattern).unwrap_err();
        assert!(matches!(err, PlanError::UnboundGroup { .. }));
    }

    #[test]
    fn transparent_group_exposes_named_groups() {
        let node = plan::<(Named, u8)>(r"(a(b(?<value>\d+))) (\d)").unwrap();
        let named = &node.constructor_children()[0];
        assert_eq!(named.strategy(), ConstructorInvoke);
        assert_eq!(named.property_children()[0].node().group().name(), "value");
    }

    struct Point(u32, u32);

    impl Extract for Point {
        fn shape() -> Shape {
            Shape::Record(RecordShape::positional(vec![
                Field::new::<u32>("0"),
                Field::new::<u32>("1"),
            ]))
        }
        fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
            let mut fields = Fields::new(node, cx, span);
            Ok(Point(fields.next()?, fields.next()?))
        }
    }

    #[test]
    fn record_without_groups() {
        let node = plan::<Pair>(r"\d+").unwrap();
        assert_eq!(node.strategy(), ConstructorInvoke);
        assert!(node.constructor_children().is_empty());

        let err = plan::<Point>(r"\d+").unwrap_err();
        assert!(matches!(err, PlanError::MissingConstructor { count: 0, .. }));
    }

    #[test]
    fn positional_record() {
        let node = plan::<Point>(r"(\d+),(\d+)").unwrap();
        assert_eq!(node.constructor_children().len(), 2);

        let err = plan::<Point>(r"(?<x>\d+),(\d+)").unwrap_err();
        assert!(matches!(err, PlanError::MissingProperty { .. }));
    }
}

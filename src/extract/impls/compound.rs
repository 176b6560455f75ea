use std::collections::*;
use std::hash::Hash;

use crate::*;

macro_rules! impl_tuple {
    ($($t: ident),+) => {
        impl<$($t: Extract),+> Spread for ($($t,)+) {
            fn element_types() -> Vec<TypeRef> {
                let mut types = vec![];
                $(match $t::spread() {
                    Some(inner) => types.extend(inner),
                    None => types.push(TypeRef::of::<$t>()),
                })+
                types
            }
            fn from_spread(elements: &mut Elements<'_, '_>) -> Result<Self, ExtractError> {
                Ok(($($t::from_elements(elements)?,)+))
            }
        }

        impl<$($t: Extract),+> Extract for ($($t,)+) {
            fn shape() -> Shape {
                Shape::Tuple(Self::element_types())
            }
            fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
                let mut elements = Elements::new(node, cx, span);
                Self::from_spread(&mut elements)
            }
            fn absent() -> Option<Self> {
                Some(($($t::absent()?,)+))
            }
        }
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
impl_tuple!(A, B, C, D, E);
impl_tuple!(A, B, C, D, E, F);
impl_tuple!(A, B, C, D, E, F, G);
impl_tuple!(A, B, C, D, E, F, G, H);
impl_tuple!(A, B, C, D, E, F, G, H, I);
impl_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);

impl<U: Spread + Extract> Extract for Rest<U> {
    fn shape() -> Shape {
        U::shape()
    }
    fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
        U::construct(node, cx, span).map(Rest)
    }
    fn absent() -> Option<Self> {
        U::absent().map(Rest)
    }
    fn from_elements(elements: &mut Elements<'_, '_>) -> Result<Self, ExtractError> {
        U::from_spread(elements).map(Rest)
    }
    fn spread() -> Option<Vec<TypeRef>> {
        Some(U::element_types())
    }
}

macro_rules! impl_collection {
    ($($ty: ident<T $(: $($bound: path),+)?>),+) => {
        $(impl<T: Extract $($(+ $bound)+)?> Extract for $ty<T> {
            fn shape() -> Shape {
                Shape::Collection(TypeRef::of::<T>())
            }
            fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
                cx.collect::<Self, T>(node, span)
            }
            fn absent() -> Option<Self> {
                Some($ty::new())
            }
        })+
    };
}

impl_collection!(Vec<T>, VecDeque<T>, BTreeSet<T: Ord>, HashSet<T: Eq, Hash>);

impl<K: Extract + Ord, V: Extract> Extract for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Collection(TypeRef::of::<(K, V)>())
    }
    fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
        cx.collect::<Self, (K, V)>(node, span)
    }
    fn absent() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<K: Extract + Eq + Hash, V: Extract> Extract for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::Collection(TypeRef::of::<(K, V)>())
    }
    fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
        cx.collect::<Self, (K, V)>(node, span)
    }
    fn absent() -> Option<Self> {
        Some(HashMap::new())
    }
}

use std::num::*;

use crate::*;

macro_rules! doc_concat {
    ($target: item, $($doc: expr),+) => {
        $(#[doc = $doc])+
        $target
    };
}

macro_rules! impl_num {
    ($absent: expr; $($ty: ty),+) => {
        $(impl Extract for $ty {
            fn shape() -> Shape {
                Shape::Leaf(LeafKind::Parse)
            }
            fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
                cx.parse(node, span)
            }
            doc_concat! {
                fn absent() -> Option<Self> {
                    $absent
                },
                concat!("An absent group is `", stringify!($absent), "`.")
            }
        })+
    };
}

impl_num!(Some(0); u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_num!(Some(0.0); f32, f64);

// there is no zero for these
impl_num!(None;
    NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize
);

use std::ffi::OsString;
use std::net::*;
use std::path::PathBuf;

use crate::*;

macro_rules! impl_parse {
    ($($ty: ty => $absent: expr),+ $(,)?) => {
        $(impl Extract for $ty {
            fn shape() -> Shape {
                Shape::Leaf(LeafKind::Parse)
            }
            fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
                cx.parse(node, span)
            }
            fn absent() -> Option<Self> {
                $absent
            }
        })+
    };
}

impl_parse!(
    bool => Some(false),
    char => Some('\0'),
    IpAddr => Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
    Ipv4Addr => Some(Ipv4Addr::UNSPECIFIED),
    Ipv6Addr => Some(Ipv6Addr::UNSPECIFIED),
    SocketAddr => Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)),
    SocketAddrV4 => Some(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)),
    SocketAddrV6 => Some(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0)),
);

impl Extract for String {
    fn shape() -> Shape {
        Shape::Leaf(LeafKind::Text)
    }
    fn construct(_: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
        Ok(cx.text(span).to_string())
    }
    /// An absent group is the empty string.
    fn absent() -> Option<Self> {
        Some(String::new())
    }
}

macro_rules! impl_string_construct {
    ($($ty: ty),+) => {
        $(impl Extract for $ty {
            fn shape() -> Shape {
                Shape::Leaf(LeafKind::StringConstruct)
            }
            fn construct(_: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
                Ok(<$ty>::from(cx.text(span).to_string()))
            }
            fn absent() -> Option<Self> {
                Some(<$ty>::new())
            }
        })+
    };
}

impl_string_construct!(PathBuf, OsString);

impl<T: Extract> Extract for Option<T> {
    fn shape() -> Shape {
        Shape::Nullable(TypeRef::of::<T>())
    }
    fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
        T::construct(node, cx, span).map(Some)
    }
    /// An absent group is `None`.
    fn absent() -> Option<Self> {
        Some(None)
    }
}

/// Shaped like `T`. Allows recursive types.
impl<T: Extract> Extract for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
    fn construct(node: &PlanNode, cx: &Execution<'_>, span: Span) -> Result<Self, ExtractError> {
        T::construct(node, cx, span).map(Box::new)
    }
    fn absent() -> Option<Self> {
        T::absent().map(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use std::net::*;

    use crate::*;

    #[test]
    fn text_types() {
        let value: (String, std::path::PathBuf) = extract("cp notes.txt", r"(\w+) (\S+)").unwrap();
        assert_eq!(value.0, "cp");
        assert_eq!(value.1, std::path::Path::new("notes.txt"));
    }

    #[test]
    fn char_and_bool() {
        let value: (char, bool) = extract("x=true", r"(.)=(\w+)").unwrap();
        assert_eq!(value, ('x', true));

        assert!(extract::<(char,)>("xy", r"(\w+)").is_err());
    }

    #[test]
    fn address() {
        let ip: Ipv4Addr = extract("host 10.0.0.1", r"host (\S+)").unwrap();
        assert_eq!(ip, Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn option_is_none_when_absent() {
        let value: (Option<u8>, Option<u8>) = extract("5", r"(\d)|(x)").unwrap();
        assert_eq!(value, (Some(5), None));
    }

    #[test]
    fn absent_address_is_unspecified() {
        let value: (Ipv4Addr, String) = extract("x", r"(\S+\.\S+)?(x)").unwrap();
        assert_eq!(value, (Ipv4Addr::UNSPECIFIED, "x".to_string()));

        let value: (IpAddr, SocketAddr, char) = extract("x", r"(\S+)?(\S+:\d+)?(x)").unwrap();
        assert_eq!(value.0, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(value.1.ip().is_unspecified());
        assert_eq!(value.1.port(), 0);

        let value: (SocketAddrV6, char) = extract("x", r"(\[\S+\]:\d+)?(x)").unwrap();
        assert_eq!(value.0, SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0));
    }
}

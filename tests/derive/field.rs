use pretty_assertions::assert_eq;
use regextract::*;

#[test]
fn rename() {
    #[derive(Extract, Debug, PartialEq)]
    struct Duration {
        #[extract(rename = "h")]
        hours: u8,
        #[extract(rename = "m")]
        minutes: u8,
    }

    let value: Duration = extract("3h25m", r"(?<h>\d+)h(?<m>\d+)m").unwrap();
    assert_eq!(
        value,
        Duration {
            hours: 3,
            minutes: 25
        }
    );

    // the field name is no longer a group name
    let err = Plan::<Duration>::new(r"(?<hours>\d+)h").unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::MissingProperty { .. })));

    // positional groups don't care about names
    let value: Duration = extract("3:25", r"(\d+):(\d+)").unwrap();
    assert_eq!(value.minutes, 25);
}

#[test]
fn default_value() {
    #[derive(Extract, Debug, PartialEq)]
    struct Address {
        host: String,
        #[extract(default = 8080)]
        port: u16,
    }

    let value: Address = extract("at localhost", r"at (?<host>\w+)").unwrap();
    assert_eq!(
        value,
        Address {
            host: "localhost".into(),
            port: 8080
        }
    );

    let value: Address = extract("at localhost:80", r"at (?<host>\w+):(?<port>\d+)").unwrap();
    assert_eq!(value.port, 80);
}

#[test]
fn default_from_default_trait() {
    #[derive(Extract, Debug, PartialEq)]
    enum Protocol {
        Tcp,
        Udp,
    }
    impl Default for Protocol {
        fn default() -> Self {
            Protocol::Tcp
        }
    }

    #[derive(Extract, Debug, PartialEq)]
    struct Socket {
        port: u16,
        #[extract(default)]
        protocol: Protocol,
    }

    let value: Socket = extract(":53", r":(?<port>\d+)").unwrap();
    assert_eq!(
        value,
        Socket {
            port: 53,
            protocol: Protocol::Tcp
        }
    );

    // the default also fills an absent record
    let value: (Option<u8>, Socket) = extract("5", r"(\d)?(x)?").unwrap();
    assert_eq!(value.0, Some(5));
    assert_eq!(
        value.1,
        Socket {
            port: 0,
            protocol: Protocol::Tcp
        }
    );
}

#[test]
fn skip() {
    #[derive(Extract, Debug, PartialEq)]
    struct Token {
        text: String,
        #[extract(skip)]
        seen: u32,
        #[extract(skip, default = vec!["parsed"])]
        tags: Vec<&'static str>,
    }

    let value: Token = extract("<abc>", r"<(\w+)>").unwrap();
    assert_eq!(
        value,
        Token {
            text: "abc".into(),
            seen: 0,
            tags: vec!["parsed"]
        }
    );

    // skipped fields take no group
    let err = Plan::<Token>::new(r"<(\w+)> (\d+)").unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::TooManyGroups { .. })));

    // and are not properties
    let err = Plan::<Token>::new(r"<(?<seen>\d+)>").unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::MissingProperty { .. })));
}

#[test]
fn skip_in_tuple_struct() {
    #[derive(Extract, Debug, PartialEq)]
    struct Tagged(u8, #[extract(skip)] bool, char);

    let value: Tagged = extract("5c", r"(\d)(\w)").unwrap();
    assert_eq!(value, Tagged(5, false, 'c'));
}

#[test]
fn raw_identifier() {
    #[derive(Extract, Debug, PartialEq)]
    struct Item {
        r#type: String,
        name: String,
    }

    let value: Item = extract("fn main", r"(?<type>\w+) (?<name>\w+)").unwrap();
    assert_eq!(
        value,
        Item {
            r#type: "fn".into(),
            name: "main".into()
        }
    );
}

use pretty_assertions::assert_eq;
use regextract::*;

#[derive(Extract, Debug, PartialEq)]
struct Range {
    start: u32,
    end: u32,
}

#[test]
fn positional() {
    let value: Range = extract("3..7", r"(\d+)\.\.(\d+)").unwrap();
    assert_eq!(value, Range { start: 3, end: 7 });
}

#[test]
fn by_group_name() {
    let value: Range = extract("7 to 3", r"(?<end>\d+) to (?<start>\d+)").unwrap();
    assert_eq!(value, Range { start: 3, end: 7 });
}

#[test]
fn positional_then_named() {
    // numbered groups fill the fields in order, named groups overwrite them afterwards
    let value: Range = extract("1 2 9", r"(\d+) (\d+) (?<end>\d+)").unwrap();
    assert_eq!(value, Range { start: 1, end: 9 });
}

#[test]
fn unbound_fields_are_absent() {
    let value: Range = extract("end=5", r"end=(?<end>\d+)").unwrap();
    assert_eq!(value, Range { start: 0, end: 5 });
}

#[test]
fn unknown_property() {
    let err = Plan::<Range>::new(r"(?<ennd>\d+)").unwrap_err();
    match err {
        Error::Plan(PlanError::MissingProperty {
            name, suggestion, ..
        }) => {
            assert_eq!(name, "ennd");
            assert_eq!(suggestion, Some("end"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn tuple_struct() {
    #[derive(Extract, Debug, PartialEq)]
    struct Rgb(u8, u8, u8);

    let value: Rgb = extract("rgb(1, 2, 3)", r"rgb\((\d+), (\d+), (\d+)\)").unwrap();
    assert_eq!(value, Rgb(1, 2, 3));

    let err = Plan::<Rgb>::new(r"rgb\((\d+), (\d+)\)").unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::NotEnoughGroups { .. })));
}

#[test]
fn unit_struct() {
    #[derive(Extract, Debug, PartialEq)]
    struct Marker;

    let value: (Marker, u8) = extract("x 5", r"(x) (\d)").unwrap();
    assert_eq!(value, (Marker, 5));
}

#[test]
fn nested_structs() {
    #[derive(Extract, Debug, PartialEq)]
    struct Line {
        from: Point,
        to: Point,
    }
    #[derive(Extract, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    let value: Line = extract(
        "(1,2)->(-3,4)",
        r"(\((-?\d+),(-?\d+)\))->(\((-?\d+),(-?\d+)\))",
    )
    .unwrap();
    assert_eq!(
        value,
        Line {
            from: Point { x: 1, y: 2 },
            to: Point { x: -3, y: 4 }
        }
    );

    // a record without groups of its own is built by name, so the inner groups are left over
    let err = Plan::<Line>::new(r"\((\d+),(\d+)\)->\((\d+),(\d+)\)").unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::TooManyGroups { .. })));
}

#[test]
fn named_group_with_nested_record() {
    #[derive(Extract, Debug, PartialEq)]
    struct Move {
        piece: char,
        target: Square,
    }
    #[derive(Extract, Debug, PartialEq)]
    struct Square {
        file: char,
        rank: u8,
    }

    let value: Move = extract("N->e4", r"(?<piece>\w)->(?<target>(\w)(\d))").unwrap();
    assert_eq!(
        value,
        Move {
            piece: 'N',
            target: Square { file: 'e', rank: 4 }
        }
    );
}

#[test]
fn by_name_only() {
    #[derive(Extract, Debug, PartialEq)]
    #[extract(by_name)]
    struct Config {
        host: String,
        port: u16,
    }

    let value: Config = extract("port=80 host=local", r"port=(?<port>\d+) host=(?<host>\w+)").unwrap();
    assert_eq!(
        value,
        Config {
            host: "local".into(),
            port: 80
        }
    );

    // numbered groups are looked through
    let value: Config = extract("a:1", r"(\w):(?<port>\d)").unwrap();
    assert_eq!(value.port, 1);
    assert_eq!(value.host, "");

    let options = ExtractOptions::builder().strict().build();
    let err = Plan::<Config>::with_options(r"(\w):(?<port>\d)", options).unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::UnboundGroup { .. })));
}

#[test]
fn default_pattern() {
    #[derive(Extract, Debug, PartialEq)]
    #[extract(pattern = r"(?<key>[a-z]+)\s*=\s*(?<value>\d+)", flags = "i")]
    struct Setting {
        key: String,
        value: u32,
    }

    let value: Setting = extract_default("Width = 80").unwrap();
    assert_eq!(
        value,
        Setting {
            key: "Width".into(),
            value: 80
        }
    );
    assert_eq!(Setting::PATTERN, r"(?<key>[a-z]+)\s*=\s*(?<value>\d+)");
    assert!(Setting::options().case_insensitive);

    let value: Setting = "HEIGHT=1".extract_default().unwrap();
    assert_eq!(value.value, 1);
}

#[test]
fn from_str_and_from_string() {
    #[derive(Extract, Debug, PartialEq)]
    #[extract(from_str)]
    struct Celsius(f64);

    impl std::str::FromStr for Celsius {
        type Err = std::num::ParseFloatError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.trim_end_matches('C').parse().map(Celsius)
        }
    }

    #[derive(Extract, Debug, PartialEq)]
    #[extract(from_string)]
    struct City(String);

    impl From<String> for City {
        fn from(name: String) -> Self {
            City(name.to_uppercase())
        }
    }

    let value: (City, Celsius) = extract("Oslo: -3.5C", r"(\w+): (\S+)").unwrap();
    assert_eq!(value, (City("OSLO".into()), Celsius(-3.5)));
}

#[test]
fn generic_struct() {
    #[derive(Extract, Debug, PartialEq)]
    struct Pair<T> {
        left: T,
        right: T,
    }

    let value: Pair<char> = extract("a|b", r"(.)\|(.)").unwrap();
    assert_eq!(value, Pair { left: 'a', right: 'b' });
}

#[test]
fn absent_record_is_fieldwise_absent() {
    let value: (Option<Range>, Range, char) =
        extract("x", r"((\d+)-(\d+))?((\d+)-(\d+))?(x)").unwrap();
    assert_eq!(value, (None, Range { start: 0, end: 0 }, 'x'));
}

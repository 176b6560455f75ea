use pretty_assertions::assert_eq;
use regextract::*;

#[derive(Extract, Debug, PartialEq, Clone, Copy)]
#[extract(rename_all = "snake_case")]
enum Status {
    Active,
    OnHold,
    #[extract(rename = "gone")]
    Deleted,
}

#[test]
fn variant_names() {
    let value: Status = extract("on_hold", r"(\w+)").unwrap();
    assert_eq!(value, Status::OnHold);

    let value: (u32, Status) = extract("7: gone", r"(\d+): (\w+)").unwrap();
    assert_eq!(value, (7, Status::Deleted));

    // renamed variants are only parsed from their new name
    assert!(extract::<Status>("deleted", r"(\w+)").is_err());
}

#[test]
fn unknown_variant() {
    let err = extract::<Status>("paused", r"(\w+)").unwrap_err();
    assert!(err.is_input_error());
    match err {
        Error::Extract(ExtractError::Conversion {
            group,
            text,
            source,
            ..
        }) => {
            assert_eq!(group, "1");
            assert_eq!(text, "paused");
            assert_eq!(
                source.to_string(),
                "unknown variant \"paused\", expected one of: active, on_hold, gone"
            );
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn absent_without_default() {
    // the first variant stands in for a missing one
    let value: (Status, char) = extract("x", r"(\w+:)?(x)").unwrap();
    assert_eq!(value, (Status::Active, 'x'));

    #[derive(Extract, Debug, PartialEq)]
    enum Color {
        Red,
        Blue,
    }
    let value: (Color, String) = extract("x", r"(Red|Blue)?(x)").unwrap();
    assert_eq!(value, (Color::Red, "x".to_string()));
    let value: (Color, String) = extract("Bluex", r"(Red|Blue)?(x)").unwrap();
    assert_eq!(value.0, Color::Blue);

    let value: (Option<Status>, char) = extract("x", r"(\w+:)?(x)").unwrap();
    assert_eq!(value, (None, 'x'));
}

#[test]
fn default_variant() {
    #[derive(Extract, Debug, PartialEq)]
    enum Sign {
        #[extract(rename = "-")]
        Minus,
        #[extract(rename = "+", default)]
        Plus,
    }

    let value: (Sign, u32) = extract("-5", r"([+-])?(\d+)").unwrap();
    assert_eq!(value, (Sign::Minus, 5));

    let value: (Sign, u32) = extract("5", r"([+-])?(\d+)").unwrap();
    assert_eq!(value, (Sign::Plus, 5));
}

#[test]
fn other_cases() {
    #[derive(Extract, Debug, PartialEq)]
    #[extract(rename_all = "UPPERCASE")]
    enum Method {
        Get,
        Post,
    }
    #[derive(Extract, Debug, PartialEq)]
    #[extract(rename_all = "kebab-case")]
    enum Mode {
        ReadOnly,
        ReadWrite,
    }
    #[derive(Extract, Debug, PartialEq)]
    #[extract(rename_all = "SCREAMING_SNAKE_CASE")]
    enum Level {
        Warn,
        NotSet,
    }

    let value: (Method, Mode, Level) =
        extract("POST read-write NOT_SET", r"(\w+) ([\w-]+) (\w+)").unwrap();
    assert_eq!(value, (Method::Post, Mode::ReadWrite, Level::NotSet));

    let value: Vec<Method> = extract("GET,GET,POST", r"(?:(\w+),?)+").unwrap();
    assert_eq!(value, [Method::Get, Method::Get, Method::Post]);
}

#[test]
fn variant_names_are_exact() {
    #[derive(Extract, Debug, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    let value: Color = extract("Green", r"(\w+)").unwrap();
    assert_eq!(value, Color::Green);
    assert!(extract::<Color>("green", r"(\w+)").is_err());
}

#[test]
fn enum_default_pattern() {
    #[derive(Extract, Debug, PartialEq)]
    #[extract(pattern = "get|post", flags = "i", rename_all = "UPPERCASE")]
    enum Method {
        Get,
        Post,
    }

    // the whole match is the text of the variant
    let value: Method = extract_default("POST /index.html").unwrap();
    assert_eq!(value, Method::Post);
    assert_eq!(Method::PATTERN, "get|post");
}

regextract::bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Permissions: u8 {
        const READ = 1;
        const WRITE = 2;
        const EXECUTE = 4;
    }
}
extract_flags!(Permissions);

#[test]
fn flags() {
    let value: (String, Permissions) =
        extract("file.txt: READ | EXECUTE", r"(\S+): (.*)").unwrap();
    assert_eq!(
        value,
        (
            "file.txt".to_string(),
            Permissions::READ | Permissions::EXECUTE
        )
    );

    let value: (String, Permissions) = extract("file.txt", r"(\S+)(?:: (.*))?").unwrap();
    assert_eq!(value.1, Permissions::empty());

    let err = extract::<Permissions>("DELETE", r"(.*)").unwrap_err();
    assert!(matches!(err, Error::Extract(ExtractError::Conversion { .. })));
}

use regextract::{extract, Extract};

#[derive(Extract)]
struct Version(u32, u32, u32);

fn parse(line: &str) -> Option<Version> {
    extract!(line, r"v(\d+)\.(\d+)\.(\d+)" => Version).ok()
}

fn main() {
    let version = parse("release v1.22.3").unwrap();
    assert_eq!((version.0, version.1, version.2), (1, 22, 3));
    assert!(parse("nightly").is_none());
}

#[derive(regextract::Extract)]
union TestUnion {
    a: u32,
    b: f32,
}

#[derive(regextract::Extract)]
struct TestLifetime<'a> {
    text: &'a str,
}

#[derive(regextract::Extract)]
enum TestEnumLifetime<'a, T> {
    A(&'a T),
}

fn main() {}

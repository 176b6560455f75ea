#[derive(regextract::Extract)]
enum TestVariantWithFields {
    A(u32),
}

#[derive(regextract::Extract)]
enum TestSameText {
    #[extract(rename = "B")]
    A,
    B,
}

#[derive(regextract::Extract)]
enum TestTwoDefaults {
    #[extract(default)]
    A,
    #[extract(default)]
    B,
}

#[derive(regextract::Extract)]
#[extract(rename_all = "snake")]
enum TestInvalidCase {
    A,
}

#[derive(regextract::Extract)]
#[extract(rename_al = "snake_case")]
enum TestMisspelledAttribute {
    A,
}

#[derive(regextract::Extract)]
enum TestFieldAttribute {
    #[extract(skip)]
    A,
}

#[derive(regextract::Extract)]
#[extract(by_name)]
enum TestStructAttribute {
    A,
}

fn main() {}

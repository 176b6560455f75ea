#[derive(regextract::Extract)]
struct TestRenameOnTupleField(#[extract(rename = "x")] u32);

#[derive(regextract::Extract)]
struct TestDuplicateGroupName {
    #[extract(rename = "b")]
    a: u32,
    b: u32,
}

#[derive(regextract::Extract)]
struct TestMisspelledAttribute {
    #[extract(defualt)]
    a: u32,
}

#[derive(regextract::Extract)]
struct TestStructAttribute {
    #[extract(by_name)]
    a: u32,
}

#[derive(regextract::Extract)]
struct TestInvalidGroupName {
    #[extract(rename = "1x")]
    a: u32,
}

#[derive(regextract::Extract)]
struct TestRenameAndSkip {
    #[extract(rename = "x", skip)]
    a: u32,
}

#[derive(regextract::Extract)]
struct TestSkipWithValue {
    #[extract(skip = true)]
    a: u32,
}

fn main() {}

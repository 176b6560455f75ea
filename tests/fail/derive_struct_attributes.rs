#[derive(regextract::Extract)]
#[extract(patern = "a")]
struct TestMisspelledAttribute;

#[derive(regextract::Extract)]
#[extract(rename_all = "lowercase")]
struct TestEnumAttribute;

#[derive(regextract::Extract)]
#[extract(skp)]
struct TestSimilarToFieldAttribute;

#[derive(regextract::Extract)]
#[extract(bob)]
struct TestUnknownAttribute;

#[derive(regextract::Extract)]
#[extract(pattern = "(\\d+")]
struct TestInvalidPattern(u32);

#[derive(regextract::Extract)]
#[extract(pattern = "(\\w+)", flags = "iq")]
struct TestUnknownFlag(String);

#[derive(regextract::Extract)]
#[extract(flags = "i")]
struct TestFlagsWithoutPattern(String);

#[derive(regextract::Extract)]
#[extract(by_name)]
struct TestByNameOnTuple(u32, u32);

#[derive(regextract::Extract)]
#[extract(by_name, from_str)]
struct TestTwoKinds {
    a: u32,
}

#[derive(regextract::Extract)]
#[extract(pattern = "a")]
#[extract(pattern = "b")]
struct TestRepeatedAttribute;

fn main() {}

use regextract::*;

#[derive(Extract)]
struct Pair<A, B>
where
    A: Clone,
{
    first: A,
    second: B,
}

#[derive(Extract)]
struct Wrapper<T>(T, #[extract(skip)] std::marker::PhantomData<T>);

fn main() {
    let pair: Pair<u8, String> = extract("1 a", r"(\d) (\w)").unwrap();
    assert_eq!(pair.first, 1);
    assert_eq!(pair.second, "a");

    let wrapper: Wrapper<char> = extract("x", r"(x)").unwrap();
    assert_eq!(wrapper.0, 'x');
}

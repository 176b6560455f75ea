/// Find the closest match to a string in a list of strings.
pub fn find_closest<'a>(s: &str, compare: &[&'a str]) -> Option<&'a str> {
    let mut best_confidence = 0.8; // minimum confidence
    let mut best_match = None;
    for valid in compare {
        let confidence = strsim::jaro_winkler(s, valid);
        if confidence > best_confidence {
            best_confidence = confidence;
            best_match = Some(*valid);
        }
    }
    best_match
}

/// Format a list of items as a comma-separated list, with "or" before the last item.
pub fn list_items<T>(items: &[T], mut display: impl FnMut(&T) -> String) -> String {
    match items {
        [] => String::new(),
        [x] => display(x),
        [a, b] => format!("{} or {}", display(a), display(b)),
        [start @ .., last] => {
            let mut s = String::new();
            for item in start {
                s += &display(item);
                s += ", ";
            }
            s += "or ";
            s += &display(last);
            s
        }
    }
}

/// Checks that `name` can be used as the name of a capture group.
pub fn is_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

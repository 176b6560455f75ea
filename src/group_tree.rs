//! Recovers the nesting of capture groups from the pattern text.
//!
//! The regex engine reports its groups as a flat, numbered list. Binding a group to a value needs
//! to know which groups sit inside of which, so the pattern is scanned once, left to right, and
//! each capturing `(` opens a new node.

use std::ops::Range;

use crate::PatternError;

mod render;

/// One capture group of a pattern and the capture groups nested inside of it.
///
/// The name of a numbered group is its index, the name of a named group is its identifier. The root
/// node is the implicit group `0` spanning the whole pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    name: String,
    index: usize,
    named: bool,
    span: Range<usize>,
    children: Vec<GroupNode>,
}

impl GroupNode {
    /// The name of the group: either the identifier of a named group or the index of a numbered one.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The index the regex engine gives this group.
    pub fn index(&self) -> usize {
        self.index
    }
    /// `true` for `(?<name>...)` groups.
    pub fn is_named(&self) -> bool {
        self.named
    }
    /// Byte range of the group in the pattern, including its parentheses.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
    /// The capture groups directly inside of this one, in order of their opening parenthesis.
    pub fn children(&self) -> &[GroupNode] {
        &self.children
    }
    /// `true` if any group below this one is named.
    pub fn has_named_descendant(&self) -> bool {
        self.children
            .iter()
            .any(|child| child.named || child.has_named_descendant())
    }

    /// All groups of this subtree in the order of their opening parenthesis, starting with `self`.
    pub fn iter(&self) -> impl Iterator<Item = &GroupNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// The capture groups of a pattern, arranged by how they nest.
///
/// ```
/// # use regextract::GroupTree;
/// let tree = GroupTree::new(r"((\d+)-(?<high>\d+)) (?:\w)").unwrap();
/// let root = tree.root();
/// assert_eq!(root.name(), "0");
/// assert_eq!(root.children().len(), 1);
///
/// let bounds = &root.children()[0];
/// let names: Vec<_> = bounds.children().iter().map(|g| g.name()).collect();
/// assert_eq!(names, ["2", "high"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTree {
    pattern: String,
    root: GroupNode,
}

impl GroupTree {
    /// Scans `pattern` for capture groups.
    ///
    /// The pattern is expected to be accepted by the regex engine already. Only the bookkeeping needed
    /// to find the groups is checked here: balanced parentheses, closed character classes and valid
    /// group names.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Self::with_verbose(pattern, false)
    }

    /// Like [`new`](GroupTree::new), but with `#` comments skipped as in the `x` flag.
    pub(crate) fn with_verbose(pattern: &str, verbose: bool) -> Result<Self, PatternError> {
        let scanner = Scanner {
            pattern,
            verbose: verbose || leading_verbose_flag(pattern),
        };
        let (root, _, _) = scanner.group(Opening::Root, 1)?;
        Ok(Self {
            pattern: pattern.to_string(),
            root,
        })
    }

    /// The implicit group `0` of the whole pattern.
    pub fn root(&self) -> &GroupNode {
        &self.root
    }

    /// The scanned pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of groups including the root.
    pub fn len(&self) -> usize {
        self.root.iter().count()
    }

    /// Always `false`, since the root is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The group with the given engine index.
    pub fn get(&self, index: usize) -> Option<&GroupNode> {
        self.root.iter().find(|node| node.index == index)
    }

    /// Checks that this tree numbers its groups exactly like the regex engine.
    ///
    /// `engine_names` holds the engine's name for each group index, `None` for numbered groups.
    pub(crate) fn check_order(&self, engine_names: &[Option<String>]) -> Result<(), PatternError> {
        let mut nodes: Vec<&GroupNode> = self.root.iter().collect();
        nodes.sort_by_key(|node| node.index);

        for (index, expected) in engine_names.iter().enumerate() {
            let expected = match expected {
                Some(name) => name.clone(),
                None => index.to_string(),
            };
            let found = match nodes.get(index) {
                Some(node) if node.index == index => node.name.clone(),
                _ => String::from("<missing>"),
            };
            if found != expected {
                return Err(PatternError::GroupOrder {
                    index,
                    expected,
                    found,
                });
            }
        }
        if let Some(extra) = nodes.get(engine_names.len()) {
            return Err(PatternError::GroupOrder {
                index: extra.index,
                expected: String::from("<missing>"),
                found: extra.name.clone(),
            });
        }
        Ok(())
    }
}

/// What opened the group that is currently being scanned.
enum Opening {
    Root,
    Group {
        /// position of the `(`
        open: usize,
        /// position of the first character after the `(` and the name, if any
        body: usize,
        name: Option<String>,
        index: usize,
    },
}

/// What follows a `(`.
enum Opener {
    Capture { body: usize, name: Option<String> },
    NonCapturing { body: usize },
}

struct Scanner<'p> {
    pattern: &'p str,
    verbose: bool,
}

impl Scanner<'_> {
    fn char_at(&self, pos: usize) -> Option<char> {
        self.pattern.get(pos..).and_then(|rest| rest.chars().next())
    }

    fn starts_with_at(&self, pos: usize, needle: &str) -> bool {
        self.pattern
            .get(pos..)
            .map_or(false, |rest| rest.starts_with(needle))
    }

    /// Scans one group up to and including its `)`.
    ///
    /// Returns the node, the position after the group and the next free group index.
    fn group(
        &self,
        opening: Opening,
        mut next_index: usize,
    ) -> Result<(GroupNode, usize, usize), PatternError> {
        let mut pos = match &opening {
            Opening::Root => 0,
            Opening::Group { body, .. } => *body,
        };
        let mut children = vec![];
        let mut ignored = vec![];

        loop {
            let c = match self.char_at(pos) {
                Some(c) => c,
                None => {
                    if let Some(&open) = ignored.last() {
                        return Err(PatternError::Unclosed { position: open });
                    }
                    return match opening {
                        Opening::Root => Ok((
                            GroupNode {
                                name: String::from("0"),
                                index: 0,
                                named: false,
                                span: 0..self.pattern.len(),
                                children,
                            },
                            pos,
                            next_index,
                        )),
                        Opening::Group { open, .. } => Err(PatternError::Unclosed { position: open }),
                    };
                }
            };

            match c {
                '\\' => {
                    pos += 1;
                    if let Some(escaped) = self.char_at(pos) {
                        pos += escaped.len_utf8();
                    }
                }
                '[' => pos = self.class(pos)?,
                '#' if self.verbose => {
                    pos = match self.pattern[pos..].find('\n') {
                        Some(offset) => pos + offset + 1,
                        None => self.pattern.len(),
                    };
                }
                '(' => match self.opener(pos)? {
                    Opener::Capture { body, name } => {
                        let index = next_index;
                        let child_opening = Opening::Group {
                            open: pos,
                            body,
                            name,
                            index,
                        };
                        let (child, after, next) = self.group(child_opening, index + 1)?;
                        children.push(child);
                        next_index = next;
                        pos = after;
                    }
                    Opener::NonCapturing { body } => {
                        ignored.push(pos);
                        pos = body;
                    }
                },
                ')' => {
                    if ignored.pop().is_some() {
                        pos += 1;
                        continue;
                    }
                    let (open, name, index) = match opening {
                        Opening::Root => return Err(PatternError::UnmatchedClose { position: pos }),
                        Opening::Group {
                            open, name, index, ..
                        } => (open, name, index),
                    };
                    let node = GroupNode {
                        named: name.is_some(),
                        name: name.unwrap_or_else(|| index.to_string()),
                        index,
                        span: open..pos + 1,
                        children,
                    };
                    return Ok((node, pos + 1, next_index));
                }
                c => pos += c.len_utf8(),
            }
        }
    }

    /// Classifies the group opened by the `(` at `pos`.
    fn opener(&self, pos: usize) -> Result<Opener, PatternError> {
        let after = pos + 1;
        if !self.starts_with_at(after, "?") {
            return Ok(Opener::Capture {
                body: after,
                name: None,
            });
        }
        let marker = after + 1;
        if self.starts_with_at(marker, "<=") || self.starts_with_at(marker, "<!") {
            // lookbehind
            return Ok(Opener::NonCapturing { body: marker + 2 });
        }
        let name_start = if self.starts_with_at(marker, "P<") {
            Some((marker + 2, '>'))
        } else if self.starts_with_at(marker, "<") {
            Some((marker + 1, '>'))
        } else if self.starts_with_at(marker, "'") {
            Some((marker + 1, '\''))
        } else {
            None
        };
        match name_start {
            Some((start, closer)) => {
                let (name, body) = self.group_name(start, closer)?;
                Ok(Opener::Capture {
                    body,
                    name: Some(name),
                })
            }
            None => Ok(Opener::NonCapturing { body: marker }),
        }
    }

    /// Reads a group name starting at `start` up to `closer`.
    fn group_name(&self, start: usize, closer: char) -> Result<(String, usize), PatternError> {
        let rest = &self.pattern[start..];
        let end = match rest.find(closer) {
            Some(end) => end,
            None => {
                return Err(PatternError::InvalidGroupName {
                    name: rest.to_string(),
                    position: start,
                })
            }
        };
        let name = &rest[..end];
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(PatternError::InvalidGroupName {
                name: name.to_string(),
                position: start,
            });
        }
        Ok((name.to_string(), start + end + closer.len_utf8()))
    }

    /// Skips the character class starting with the `[` at `start`. Returns the position after its `]`.
    ///
    /// Classes nest, e.g. `[a-z&&[^aeiou]]` or `[[:alpha:]]`. A `]` directly after the opening `[`
    /// or `[^` is a literal.
    fn class(&self, start: usize) -> Result<usize, PatternError> {
        let mut depth = 0usize;
        let mut pos = start;
        loop {
            let c = self
                .char_at(pos)
                .ok_or(PatternError::UnterminatedClass { position: start })?;
            match c {
                '[' => {
                    depth += 1;
                    pos += 1;
                    if self.starts_with_at(pos, "^") {
                        pos += 1;
                    }
                    if self.starts_with_at(pos, "]") {
                        pos += 1;
                    }
                }
                ']' => {
                    depth -= 1;
                    pos += 1;
                    if depth == 0 {
                        return Ok(pos);
                    }
                }
                '\\' => {
                    pos += 1;
                    if let Some(escaped) = self.char_at(pos) {
                        pos += escaped.len_utf8();
                    }
                }
                c => pos += c.len_utf8(),
            }
        }
    }
}

/// `true` if the pattern starts with an inline flag group that enables `x`, like `(?x)` or `(?ix:`.
fn leading_verbose_flag(pattern: &str) -> bool {
    let flags = match pattern.strip_prefix("(?") {
        Some(rest) => rest,
        None => return false,
    };
    flags
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .any(|c| c == 'x')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(node: &GroupNode) -> String {
        if node.children.is_empty() {
            node.name.clone()
        } else {
            let children: Vec<_> = node.children.iter().map(shape).collect();
            format!("{}[{}]", node.name, children.join(" "))
        }
    }

    fn tree(pattern: &str) -> String {
        shape(GroupTree::new(pattern).unwrap().root())
    }

    #[test]
    fn flat_groups() {
        assert_eq!(tree(r"(\d+)-(\d+)"), "0[1 2]");
        assert_eq!(tree(r"\d+"), "0");
    }

    #[test]
    fn nested_groups() {
        assert_eq!(tree(r"((\d+)-(\d+)) (\w): (.*)"), "0[1[2 3] 4 5]");
        assert_eq!(tree(r"(((.)(.)))"), "0[1[2[3 4]]]");
    }

    #[test]
    fn named_groups_take_an_index() {
        let tree = GroupTree::new(r"(?<n>\d+)=(?P<v>\w+)(x)").unwrap();
        assert_eq!(shape(tree.root()), "0[n v 3]");
        let indices: Vec<_> = tree.root().iter().map(|n| n.index()).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
        assert!(tree.root().children()[0].is_named());
        assert!(!tree.root().children()[2].is_named());
    }

    #[test]
    fn non_capturing_groups_are_skipped() {
        assert_eq!(tree(r"(?:(\d+) ?)+"), "0[1]");
        assert_eq!(tree(r"(?i)(a)(?i:(b))"), "0[1 2]");
        assert_eq!(tree(r"(?=(a))(?<!x)(b)"), "0[1 2]");
    }

    #[test]
    fn escapes_and_classes() {
        assert_eq!(tree(r"\((a)\)"), "0[1]");
        assert_eq!(tree(r"[(](a)[)]"), "0[1]");
        assert_eq!(tree(r"[]()](a)"), "0[1]");
        assert_eq!(tree(r"[^]()](a)"), "0[1]");
        assert_eq!(tree(r"[a-z&&[^(aeiou)]](b)"), "0[1]");
        assert_eq!(tree(r"[[:alpha:](](c)"), "0[1]");
        assert_eq!(tree(r"[\](](d)"), "0[1]");
    }

    #[test]
    fn verbose_comments() {
        let tree = GroupTree::with_verbose("(a) # not a (group)\n(b)", true).unwrap();
        assert_eq!(shape(tree.root()), "0[1 2]");
        assert_eq!(tree.len(), 3);

        let tree = GroupTree::new("(?x)(a) # (c)\n(b)").unwrap();
        assert_eq!(shape(tree.root()), "0[1 2]");
    }

    #[test]
    fn spans() {
        let tree = GroupTree::new(r"x((a)b)").unwrap();
        let outer = &tree.root().children()[0];
        assert_eq!(outer.span(), 1..7);
        assert_eq!(outer.children()[0].span(), 2..5);
        assert_eq!(tree.root().span(), 0..7);
    }

    #[test]
    fn unbalanced() {
        assert!(matches!(
            GroupTree::new("(a))"),
            Err(PatternError::UnmatchedClose { position: 3 })
        ));
        assert!(matches!(
            GroupTree::new("x(a(b)"),
            Err(PatternError::Unclosed { position: 1 })
        ));
        assert!(matches!(
            GroupTree::new("(?:a"),
            Err(PatternError::Unclosed { position: 0 })
        ));
        assert!(matches!(
            GroupTree::new("a[bc"),
            Err(PatternError::UnterminatedClass { position: 1 })
        ));
    }

    #[test]
    fn invalid_names() {
        assert!(matches!(
            GroupTree::new("(?<1a>x)"),
            Err(PatternError::InvalidGroupName { position: 3, .. })
        ));
        assert!(matches!(
            GroupTree::new("(?<a.b>x)"),
            Err(PatternError::InvalidGroupName { .. })
        ));
        assert!(matches!(
            GroupTree::new("(?<abc"),
            Err(PatternError::InvalidGroupName { .. })
        ));
    }

    #[test]
    fn order_check() {
        let tree = GroupTree::new(r"(a)(?<b>b)").unwrap();
        tree.check_order(&[None, None, Some(String::from("b"))])
            .unwrap();

        let err = tree
            .check_order(&[None, Some(String::from("b")), None])
            .unwrap_err();
        assert!(matches!(err, PatternError::GroupOrder { index: 1, .. }));

        let err = tree.check_order(&[None, None]).unwrap_err();
        assert!(matches!(err, PatternError::GroupOrder { index: 2, .. }));
    }

    #[test]
    fn lookup() {
        let tree = GroupTree::new(r"((a)(b))").unwrap();
        assert_eq!(tree.get(3).map(|n| n.name()), Some("3"));
        assert!(tree.get(4).is_none());
        assert!(tree.root().children()[0].children()[1].children().is_empty());
    }
}

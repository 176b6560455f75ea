use super::*;

impl GroupTree {
    /// Draws the groups of the pattern underneath it, one line per nesting depth.
    ///
    /// ```
    /// # use regextract::GroupTree;
    /// let tree = GroupTree::new(r"((\d+)-(?<b>\d+))").unwrap();
    /// assert_eq!(
    ///     tree.render(),
    ///     "\
    /// ((\\d+)-(?<b>\\d+))
    /// [1--------------]
    ///  [2--] [b------]
    /// "
    /// );
    /// ```
    pub fn render(&self) -> String {
        let width = self.pattern.chars().count();
        let mut out = format!("{}\n", self.pattern);

        let mut level: Vec<&GroupNode> = self.root.children.iter().collect();
        while !level.is_empty() {
            let mut line = vec![' '; width];
            for node in &level {
                self.draw(node, &mut line);
            }
            let line: String = line.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');

            level = level.iter().flat_map(|node| node.children.iter()).collect();
        }
        out
    }

    fn draw(&self, node: &GroupNode, line: &mut [char]) {
        let start = self.pattern[..node.span.start].chars().count();
        let end = start + self.pattern[node.span.clone()].chars().count();
        if end <= start {
            return;
        }
        for c in &mut line[start..end] {
            *c = '-';
        }
        line[start] = '[';
        line[end - 1] = ']';

        // the label only goes in if it leaves both brackets intact
        let label: Vec<char> = node.name.chars().collect();
        if label.len() + 2 <= end - start {
            line[start + 1..start + 1 + label.len()].copy_from_slice(&label);
        }
    }
}

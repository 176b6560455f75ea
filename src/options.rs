//! Settings for compiling a pattern and building a plan

use crate::PatternError;

/// Flags for the regex engine and for the plan builder.
///
/// Construct with [`ExtractOptions::builder`] or [`ExtractOptions::from_flags`]. The default enables
/// none of the flags, which matches the default behavior of the [`regex`] crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct ExtractOptions {
    /// `i`: letters match both upper and lower case.
    pub case_insensitive: bool,
    /// `m`: `^` and `$` match at the beginning and end of lines.
    pub multi_line: bool,
    /// `s`: `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// `x`: whitespace in the pattern is ignored and `#` starts a comment.
    pub ignore_whitespace: bool,
    /// `U`: the meaning of `x*` and `x*?` is swapped.
    pub swap_greed: bool,
    /// `R`: `\r\n` is treated as a line terminator in multi-line mode.
    pub crlf: bool,
    /// Unicode-aware classes like `\w` and `\d`. Enabled by default.
    pub unicode: bool,
    /// A numbered group that has no constructor slot to bind to is an error, instead of being
    /// looked through for named groups.
    pub strict: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ExtractOptions {
    /// Creates a builder for the [`ExtractOptions`] struct.
    ///
    /// Default settings:
    /// - all regex flags off, except unicode
    /// - not strict
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder {
            options: ExtractOptions {
                case_insensitive: false,
                multi_line: false,
                dot_matches_new_line: false,
                ignore_whitespace: false,
                swap_greed: false,
                crlf: false,
                unicode: true,
                strict: false,
            },
        }
    }

    /// Parses inline flag letters, as they would appear in `(?imsx)`.
    ///
    /// ```
    /// # use regextract::ExtractOptions;
    /// let options = ExtractOptions::from_flags("ix").unwrap();
    /// assert!(options.case_insensitive);
    /// assert!(options.ignore_whitespace);
    /// assert!(!options.multi_line);
    ///
    /// assert!(ExtractOptions::from_flags("q").is_err());
    /// ```
    pub fn from_flags(flags: &str) -> Result<Self, PatternError> {
        let mut builder = Self::builder();
        for flag in flags.chars() {
            builder = match flag {
                'i' => builder.case_insensitive(),
                'm' => builder.multi_line(),
                's' => builder.dot_matches_new_line(),
                'x' => builder.ignore_whitespace(),
                'U' => builder.swap_greed(),
                'R' => builder.crlf(),
                other => return Err(PatternError::UnknownFlag(other)),
            };
        }
        Ok(builder.build())
    }

    pub(crate) fn parser(&self) -> regex_syntax::Parser {
        regex_syntax::ParserBuilder::new()
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .swap_greed(self.swap_greed)
            .crlf(self.crlf)
            .unicode(self.unicode)
            .build()
    }
}

/// A builder for the [`ExtractOptions`] struct, since it is marked as `#[non_exhaustive]` and thus cannot be
/// constructed directly.
#[derive(Clone, Debug)]
pub struct OptionsBuilder {
    options: ExtractOptions,
}

impl OptionsBuilder {
    /// Enables the `i` flag.
    pub fn case_insensitive(mut self) -> Self {
        self.options.case_insensitive = true;
        self
    }
    /// Enables the `m` flag.
    pub fn multi_line(mut self) -> Self {
        self.options.multi_line = true;
        self
    }
    /// Enables the `s` flag.
    pub fn dot_matches_new_line(mut self) -> Self {
        self.options.dot_matches_new_line = true;
        self
    }
    /// Enables the `x` flag.
    pub fn ignore_whitespace(mut self) -> Self {
        self.options.ignore_whitespace = true;
        self
    }
    /// Enables the `U` flag.
    pub fn swap_greed(mut self) -> Self {
        self.options.swap_greed = true;
        self
    }
    /// Enables the `R` flag.
    pub fn crlf(mut self) -> Self {
        self.options.crlf = true;
        self
    }
    /// Disables unicode support, making `\w`, `\d` etc. ASCII-only.
    pub fn no_unicode(mut self) -> Self {
        self.options.unicode = false;
        self
    }
    /// Makes numbered groups without a constructor slot an error.
    ///
    /// Without this, a record that is built from named groups alone simply looks through numbered
    /// groups that have no slot, so that the named groups inside of them can still bind.
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Builds the [`ExtractOptions`] struct.
    pub fn build(self) -> ExtractOptions {
        self.options
    }
}

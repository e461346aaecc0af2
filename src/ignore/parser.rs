//! Pattern file parser with .gitignore syntax compatibility

use glob::{MatchOptions, Pattern, PatternError};

/// Options used for every rule: `*` and `?` stop at `/`, case matters
pub(crate) const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled rule from a pattern file
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// The original line, trimmed
    pub original: String,
    /// The compiled glob pattern, relative to the root
    pub pattern: Pattern,
    /// Type of rule (exclude or re-include)
    pub pattern_type: PatternType,
    /// Whether the rule is anchored at the root
    pub is_anchored: bool,
    /// Whether this rule only matches directories
    pub directory_only: bool,
}

impl IgnoreRule {
    /// Check if this rule matches a relative, `/`-separated path
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        if self.directory_only && !is_dir {
            return false;
        }
        self.pattern.matches_with(relative_path, MATCH_OPTIONS)
    }

    /// Whether this is a negated (`!`) rule
    pub fn is_negation(&self) -> bool {
        self.pattern_type == PatternType::Include
    }
}

/// Type of ignore rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    /// Normal ignore rule
    Ignore,
    /// Negation rule (starts with !)
    Include,
}

/// Parse a single line from a pattern file.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<IgnoreRule>, PatternError> {
    let line = line.trim();

    // Skip empty lines and comments
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (pattern_type, pattern_str) = match line.strip_prefix('!') {
        Some(rest) => (PatternType::Include, rest.trim_start()),
        None => (PatternType::Ignore, line),
    };

    // Check if pattern is directory-only (ends with /)
    let (directory_only, pattern_str) = if pattern_str.ends_with('/') {
        (true, pattern_str.trim_end_matches('/'))
    } else {
        (false, pattern_str)
    };

    // A leading slash anchors the pattern and is not part of it
    let (leading_slash, clean_pattern) = match pattern_str.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, pattern_str),
    };

    if clean_pattern.is_empty() {
        return Ok(None);
    }

    // Any remaining slash also anchors the pattern at the root
    let is_anchored = leading_slash || clean_pattern.contains('/');

    let glob_pattern = normalize_pattern(clean_pattern, is_anchored);
    let pattern = Pattern::new(&glob_pattern)?;

    Ok(Some(IgnoreRule {
        original: line.to_string(),
        pattern,
        pattern_type,
        is_anchored,
        directory_only,
    }))
}

/// Translate a gitignore pattern into a `glob` pattern relative to the root
pub(crate) fn normalize_pattern(pattern: &str, is_anchored: bool) -> String {
    let body = pattern
        .split('/')
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join("/");

    if is_anchored || body == "**" || body.starts_with("**/") {
        body
    } else {
        // Unanchored patterns match at any depth
        format!("**/{}", body)
    }
}

/// Translate one path component.
///
/// `**` is only special as a whole component; inside a component it
/// behaves like `*`. Backslash escapes become literal characters.
fn normalize_segment(segment: &str) -> String {
    if segment == "**" {
        return segment.to_string();
    }

    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, escaped);
                }
            },
            '*' if !in_class => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            },
            '[' if !in_class => {
                in_class = true;
                out.push('[');
                // gitignore accepts both [!...] and [^...]
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('!');
                }
            },
            ']' if in_class => {
                in_class = false;
                out.push(']');
            },
            _ => out.push(c),
        }
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    match c {
        '*' | '?' | '[' | ']' => {
            out.push('[');
            out.push(c);
            out.push(']');
        },
        _ => out.push(c),
    }
}

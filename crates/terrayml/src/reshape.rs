//! turn generic yaml into the nested template shape
//!
//! The normalized tree serializes repeated blocks as lists of singleton maps:
//!
//! ```yaml
//! resource:
//! - aws_instance:
//!   - - web:
//!       - ami: ami-1
//! ```
//!
//! The template section of a terrahub config wants plain nested maps:
//!
//! ```yaml
//! resource:
//!   aws_instance:
//!     web:
//!       ami: ami-1
//! ```
//!
//! Only text is available at this point, so the rewrite is driven by indentation depth:
//! - the whole document is moved under `template:`
//! - up to the block level a `- - key:` line becomes a promoted key and a `- key:` line loses its
//!   list marker
//! - from the block level on one indent unit is stripped from each line
//! - dangling `{}` lines are joined onto their key
use std::fmt::Write;

/// Marks a key that moves up one level, expanded once all lines are rewritten
const PROMOTED_KEY_MARKER: &str = "# ";
const LIST_MARKER: &str = "- ";
const DOUBLE_LIST_MARKER: &str = "- - ";
const EMPTY_OBJECT: &str = "{}";

/// Indentation of the generated document
///
/// Depths are counted in indent units, the defaults match the two space indentation of the yaml
/// encoder:
///
/// | level | content                        |
/// |-------|--------------------------------|
/// | 1     | `template:`, `name:`           |
/// | 2     | block types (`resource:`)      |
/// | 3     | `aws_instance:`, tfvars values |
/// | 4     | `web:`                         |
/// | 5     | block attributes               |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Width of one indentation level in spaces
    pub indent: usize,
    /// Level of the converted content below `template:`
    pub content_level: usize,
    /// Level of the block bodies
    pub block_level: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            indent: 2,
            content_level: 2,
            block_level: 5,
        }
    }
}

impl Layout {
    pub fn offset(&self, level: usize) -> usize {
        self.indent * level
    }

    pub fn pad(&self, level: usize) -> String {
        " ".repeat(self.offset(level))
    }

    fn content_offset(&self) -> usize {
        self.offset(self.content_level)
    }

    fn block_offset(&self) -> usize {
        self.offset(self.block_level)
    }
}

/// Rewrite yaml text into template content
///
/// Every returned line is terminated by `\n`. Blank lines (inside block scalars) keep the base
/// indentation, the result never contains an empty line.
pub fn reshape(yaml: &str, layout: &Layout) -> String {
    let base = " ".repeat(layout.content_offset());

    let promoted = yaml.lines().map(|line| {
        match rewrite_line(&format!("{base}{line}"), layout) {
            (line, true) => promote_key(&line),
            (line, false) => line,
        }
    });

    collapse_empty_objects(promoted)
        .into_iter()
        .fold(String::new(), |mut out, line| {
            let _ = writeln!(out, "{line}");
            out
        })
}

/// Number of leading spaces
pub fn depth(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Returns the rewritten line and whether it carries the promoted key marker
fn rewrite_line(line: &str, layout: &Layout) -> (String, bool) {
    let depth = depth(line);
    let (indent, content) = line.split_at(depth);
    let block_offset = layout.block_offset();
    let mut promoted = false;

    let mut rewritten = if depth <= block_offset && line.contains(':') {
        if let Some(rest) = content.strip_prefix(DOUBLE_LIST_MARKER) {
            promoted = true;
            format!("{indent}{PROMOTED_KEY_MARKER}{rest}")
        } else if let Some(rest) = content.strip_prefix(LIST_MARKER) {
            format!("{indent}{}{rest}", " ".repeat(LIST_MARKER.len()))
        } else {
            line.to_owned()
        }
    } else {
        line.to_owned()
    };

    if depth >= block_offset {
        // depth >= block_offset >= indent, all of these are spaces
        rewritten.replace_range(..layout.indent.min(depth), "");
    }

    (rewritten, promoted)
}

fn promote_key(line: &str) -> String {
    let depth = depth(line);
    match line[depth..].strip_prefix(PROMOTED_KEY_MARKER) {
        Some(rest) => format!(
            "{}{}{rest}",
            &line[..depth],
            " ".repeat(PROMOTED_KEY_MARKER.len())
        ),
        None => line.to_owned(),
    }
}

/// `{}` alone (or behind list markers) on a line belongs to the key above
fn collapse_empty_objects(lines: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for line in lines {
        let mut content = line.trim_start();
        while let Some(rest) = content.strip_prefix(LIST_MARKER) {
            content = rest.trim_start();
        }

        if content == EMPTY_OBJECT {
            if let Some(previous) = out.last_mut().filter(|previous| previous.ends_with(':')) {
                previous.push(' ');
                previous.push_str(EMPTY_OBJECT);
                continue;
            }
        }

        out.push(line);
    }

    out
}

//! Header template rendering.
//!
//! Templates use named placeholders like `{title}`. Literal braces are
//! written doubled (`{{` and `}}`), so a TypeScript header such as
//! `import {{ createStore }} from '...'` renders as
//! `import { createStore } from '...'`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitterError};

/// Placeholder filled with the descriptor title.
pub const TITLE_PLACEHOLDER: &str = "title";

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

/// Boilerplate text prepended to each output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderTemplate {
    source: String,
}

impl HeaderTemplate {
    /// Wrap raw template text.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Names of all placeholders, in order of first appearance.
    pub fn placeholders(&self) -> Result<Vec<&str>> {
        let mut names: Vec<&str> = Vec::new();
        for segment in parse(&self.source)? {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Render with the descriptor title as the only value.
    pub fn render_title(&self, title: &str) -> Result<String> {
        let mut values = BTreeMap::new();
        values.insert(TITLE_PLACEHOLDER, title);
        self.render(&values)
    }

    /// Render with the given placeholder values.
    ///
    /// Every placeholder must have a value; extra values are ignored.
    pub fn render(&self, values: &BTreeMap<&str, &str>) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in parse(&self.source)? {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Brace(c) => out.push(c),
                Segment::Placeholder(name) => match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(SplitterError::UnknownPlaceholder {
                            name: name.to_string(),
                        })
                    }
                },
            }
        }
        Ok(out)
    }
}

/// Split template text into literals, escaped braces and placeholders.
fn parse(source: &str) -> Result<Vec<Segment<'_>>> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                if literal_start < i {
                    segments.push(Segment::Literal(&source[literal_start..i]));
                }
                segments.push(Segment::Brace(bytes[i] as char));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                let close = source[i + 1..]
                    .find(['{', '}'])
                    .map(|rel| i + 1 + rel)
                    .filter(|&pos| bytes[pos] == b'}')
                    .ok_or(unbalanced('{', i))?;
                let name = &source[i + 1..close];
                if !is_placeholder_name(name) {
                    return Err(unbalanced('{', i));
                }
                if literal_start < i {
                    segments.push(Segment::Literal(&source[literal_start..i]));
                }
                segments.push(Segment::Placeholder(name));
                i = close + 1;
                literal_start = i;
            }
            b'}' => return Err(unbalanced('}', i)),
            _ => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&source[literal_start..]));
    }
    Ok(segments)
}

fn unbalanced(brace: char, offset: usize) -> SplitterError {
    SplitterError::UnbalancedBrace { brace, offset }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

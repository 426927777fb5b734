//! Line-oriented YAML highlighting.
//!
//! Not a YAML parser: each line is split into indentation, sequence dashes,
//! an optional `key:`, a value and a trailing comment. The only state carried
//! across lines is whether we are inside a block scalar (`|` / `>`), whose
//! body is rendered as a string.

use crate::style::{Style, StyledLine};

/// Highlights YAML line by line.
#[derive(Debug, Default)]
pub struct YamlHighlighter {
    /// Column of the node that opened the current block scalar: the key when
    /// there is one, otherwise the line indentation.
    block_indent: Option<usize>,
}

impl YamlHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlights one line (without its trailing newline).
    pub fn highlight_line(&mut self, line: &str) -> StyledLine {
        let indent = line.len() - line.trim_start().len();

        if let Some(block_indent) = self.block_indent {
            if line.trim().is_empty() || indent > block_indent {
                return StyledLine::plain(line, Style::String);
            }
            self.block_indent = None;
        }

        let mut out = StyledLine::empty();
        let (leading, rest) = line.split_at(indent);
        out.push(leading, Style::Plain);

        if rest.starts_with('#') {
            out.push(rest, Style::Comment);
            return out;
        }
        if is_document_marker(rest) {
            out.push(rest, Style::Separator);
            return out;
        }

        // Sequence dashes ("- ", "- - ").
        let mut rest = rest;
        while let Some(after) = rest
            .strip_prefix('-')
            .filter(|after| after.chars().next().is_none_or(char::is_whitespace))
        {
            out.push("-", Style::Dash);
            let spaces = after.len() - after.trim_start().len();
            out.push(&after[..spaces], Style::Plain);
            rest = &after[spaces..];
        }

        let key_column = line.len() - rest.len();
        let (body, comment) = split_comment(rest);

        let (value, node_indent) = match find_key_end(body) {
            Some(colon) => {
                out.push(&body[..colon], Style::Key);
                out.push(":", Style::Punctuation);
                (&body[colon + 1..], key_column)
            }
            None => (body, indent),
        };

        let trimmed = value.trim_start();
        out.push(&value[..value.len() - trimmed.len()], Style::Plain);
        if is_block_scalar_indicator(trimmed.trim_end()) {
            self.block_indent = Some(node_indent);
        }
        out.push(trimmed, classify_scalar(trimmed.trim_end()));
        out.push(comment, Style::Comment);

        out
    }

    /// Highlights a whole document.
    pub fn highlight(text: &str) -> Vec<StyledLine> {
        let mut highlighter = Self::new();
        text.lines()
            .map(|line| highlighter.highlight_line(line))
            .collect()
    }
}

fn is_document_marker(text: &str) -> bool {
    let marker = text.get(..3);
    matches!(marker, Some("---" | "..."))
        && text[3..].chars().next().is_none_or(char::is_whitespace)
}

fn is_block_scalar_indicator(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| c.is_ascii_digit() || c == '-' || c == '+')
}

/// Returns the byte index of the `:` that ends a mapping key, if any.
///
/// The colon must sit outside quotes and be followed by whitespace or the end
/// of the line.
fn find_key_end(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    if matches!(text.chars().next(), Some('{' | '[')) {
        return None;
    }

    while let Some((idx, c)) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' if idx == 0 => quote = Some(c),
                ':' => {
                    let next = chars.peek().map(|(_, n)| *n);
                    if next.is_none_or(char::is_whitespace) && idx > 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Splits a trailing ` # comment` off a line body.
fn split_comment(text: &str) -> (&str, &str) {
    let mut quote: Option<char> = None;
    let mut prev_ws = true;

    for (idx, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' if prev_ws => quote = Some(c),
                '#' if prev_ws => {
                    // Keep the whitespace before the comment with the body.
                    return text.split_at(idx);
                }
                _ => {}
            },
        }
        prev_ws = c.is_whitespace();
    }
    (text, "")
}

fn classify_scalar(value: &str) -> Style {
    if value.is_empty() {
        return Style::Plain;
    }
    if is_block_scalar_indicator(value) {
        return Style::Punctuation;
    }
    match value {
        "true" | "false" | "True" | "False" | "TRUE" | "FALSE" | "null" | "Null" | "NULL"
        | "~" => return Style::Literal,
        _ => {}
    }
    if value.starts_with('&') || value.starts_with('*') {
        return Style::Literal;
    }
    if value.starts_with('{') || value.starts_with('[') {
        return Style::Punctuation;
    }
    if value.parse::<i64>().is_ok() || value.parse::<f64>().is_ok_and(f64::is_finite) {
        return Style::Number;
    }
    Style::String
}

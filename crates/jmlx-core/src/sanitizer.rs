//! Position-preserving activation of modeling comments
//!
//! Modeling comments are copied into a virtual buffer at their original
//! (line, column), then the comment syntax around active ones is replaced
//! by spaces so the body parses as ordinary code. Inactive modeling
//! comments and ordinary comments nested in a body are blanked completely.
//! Blanking never removes characters and keeps line breaks, so every
//! surviving character sits at its source position.

use crate::config::ParserConfiguration;
use crate::error::JmlxError;
use crate::position::{Position, Range};
use crate::result::Result;
use crate::token::JavaToken;
use std::collections::HashSet;

/// The `+tag-tag@@` run that follows a comment opener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelingMarker {
    /// Raw tag characters before the first `@`
    pub tags: String,
    /// Characters covered by the tags and the `@` run
    pub len: usize,
}

/// Recognise a modeling comment from the text right after `//` or `/*`
///
/// The tag run must be empty or start with a sign; `//key@` is an ordinary
/// comment.
pub fn modeling_marker(after_opener: &str) -> Option<ModelingMarker> {
    scan_marker(after_opener.chars())
}

fn scan_marker(chars: impl Iterator<Item = char>) -> Option<ModelingMarker> {
    let mut tags = String::new();
    let mut ats = 0;
    for c in chars {
        if c == '@' {
            ats += 1;
        } else if ats == 0 && is_tag_char(c) {
            tags.push(c);
        } else {
            break;
        }
    }
    if ats == 0 || !(tags.is_empty() || tags.starts_with(['+', '-'])) {
        return None;
    }
    Some(ModelingMarker {
        len: tags.chars().count() + ats,
        tags,
    })
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '+' | '-')
}

/// Split `+a-b` into signed names; a bare sign yields an empty name
fn signed_tags(tags: &str) -> Vec<(bool, String)> {
    let mut result: Vec<(bool, String)> = Vec::new();
    for c in tags.chars() {
        match c {
            '+' => result.push((true, String::new())),
            '-' => result.push((false, String::new())),
            c => {
                if let Some((_, name)) = result.last_mut() {
                    name.push(c);
                }
            }
        }
    }
    result
}

/// Buffer produced by [`Sanitizer::sanitize`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizedText {
    text: String,
}

impl SanitizedText {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Nothing but whitespace survived
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Character at a source position, if the buffer reaches that far
    pub fn char_at(&self, target: Position) -> Option<char> {
        let mut pos = Position::HOME;
        let mut chars = self.text.chars().peekable();
        while let Some(c) = chars.next() {
            if pos == target {
                return Some(c);
            }
            match c {
                '\r' if chars.peek() == Some(&'\n') => pos.column += 1,
                '\r' | '\n' => pos = Position::new(pos.line + 1, 1),
                _ => pos.column += 1,
            }
        }
        None
    }
}

/// Activates modeling comments according to a set of enabled feature keys
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    keys: HashSet<String>,
}

impl Sanitizer {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ParserConfiguration) -> Self {
        Self::new(&config.jml_keys)
    }

    fn enabled(&self, name: &str) -> bool {
        self.keys.contains(&name.to_lowercase())
    }

    /// Whether a modeling comment with this tag run is active
    pub fn is_active(&self, tags: &str) -> bool {
        let tags = signed_tags(tags);
        if tags.iter().any(|(_, name)| name.is_empty()) {
            return false;
        }
        let mut positives = tags.iter().filter(|(plus, _)| *plus).peekable();
        let positive_ok = positives.peek().is_none() || positives.any(|(_, name)| self.enabled(name));
        let negative_hit = tags
            .iter()
            .any(|(plus, name)| !*plus && self.enabled(name));
        positive_ok && !negative_hit
    }

    /// Sanitize positioned modeling-comment tokens
    pub fn sanitize_tokens(&self, tokens: &[JavaToken]) -> Result<SanitizedText> {
        let mut pieces = Vec::with_capacity(tokens.len());
        for token in tokens {
            let range = token.range().ok_or_else(|| {
                JmlxError::token_error(format!("modeling comment {:?} has no position", token.text()))
            })?;
            pieces.push((token.text(), range));
        }
        self.sanitize(pieces)
    }

    /// Rebuild the virtual buffer from `(text, range)` pieces and mask it
    ///
    /// Pieces must come in non-decreasing position order.
    pub fn sanitize<'a, I>(&self, pieces: I) -> Result<SanitizedText>
    where
        I: IntoIterator<Item = (&'a str, Range)>,
    {
        let mut buffer = String::new();
        let mut cursor = Position::HOME;
        for (text, range) in pieces {
            let begin = range.begin;
            if begin < cursor {
                return Err(JmlxError::SanitizerOrder {
                    expected: cursor,
                    found: begin,
                });
            }
            while cursor.line < begin.line {
                buffer.push('\n');
                cursor = Position::new(cursor.line + 1, 1);
            }
            while cursor.column < begin.column {
                buffer.push(' ');
                cursor.column += 1;
            }
            buffer.push_str(text);
            cursor = cursor.advance(text);
        }

        let mut chars: Vec<char> = buffer.chars().collect();
        let continuations = self.mask_comments(&mut chars);
        mask_continuations(&mut chars, &continuations);
        Ok(SanitizedText {
            text: chars.into_iter().collect(),
        })
    }

    /// First pass; returns the char spans of active block comments
    fn mask_comments(&self, chars: &mut [char]) -> Vec<(usize, usize)> {
        let mut continuations = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match (chars[i], chars.get(i + 1).copied()) {
                ('"' | '\'', _) => i = skip_literal(chars, i),
                ('/', Some('/')) => {
                    let eol = line_end(chars, i);
                    match scan_marker(chars[i + 2..eol].iter().copied()) {
                        Some(marker) if self.is_active(&marker.tags) => {
                            blank(chars, i, i + 2 + marker.len);
                            i += 2 + marker.len;
                        }
                        marker => {
                            if let Some(marker) = marker {
                                tracing::debug!(tags = %marker.tags, "inactive modeling line comment");
                            }
                            blank(chars, i, eol);
                            i = eol;
                        }
                    }
                }
                ('/', Some('*')) => {
                    let (close, terminated) = block_end(chars, i + 2);
                    match scan_marker(chars[i + 2..close].iter().copied()) {
                        Some(marker) if self.is_active(&marker.tags) => {
                            let body = i + 2 + marker.len;
                            blank(chars, i, body);
                            if terminated && close - 2 >= body {
                                let mut start = close - 2;
                                while start > body && chars[start - 1] == '@' {
                                    start -= 1;
                                }
                                blank(chars, start, close);
                            }
                            continuations.push((i, close));
                            i = body;
                        }
                        marker => {
                            if let Some(marker) = marker {
                                tracing::debug!(tags = %marker.tags, "inactive modeling block comment");
                            }
                            blank(chars, i, close);
                            i = close;
                        }
                    }
                }
                _ => i += 1,
            }
        }
        continuations
    }
}

/// Second pass: leading `@`s on the continuation lines of active block comments
fn mask_continuations(chars: &mut [char], spans: &[(usize, usize)]) {
    for &(open, close) in spans {
        let mut i = line_end(chars, open);
        while i < close {
            i += if chars[i] == '\r' && chars.get(i + 1) == Some(&'\n') {
                2
            } else {
                1
            };
            while i < close && matches!(chars[i], ' ' | '\t' | '\u{c}') {
                i += 1;
            }
            while i < close && chars[i] == '@' {
                chars[i] = ' ';
                i += 1;
            }
            i = line_end(chars, i);
        }
    }
}

fn blank(chars: &mut [char], from: usize, to: usize) {
    let to = to.min(chars.len());
    for c in &mut chars[from..to] {
        if *c != '\n' && *c != '\r' {
            *c = ' ';
        }
    }
}

/// Index of the line break ending the line containing `from`, or the buffer end
fn line_end(chars: &[char], from: usize) -> usize {
    chars[from..]
        .iter()
        .position(|&c| c == '\n' || c == '\r')
        .map_or(chars.len(), |offset| from + offset)
}

/// Index just past the `*/` closing a block comment whose body starts at
/// `from`, or the buffer end when unterminated
fn block_end(chars: &[char], from: usize) -> (usize, bool) {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return (i + 2, true);
        }
        i += 1;
    }
    (chars.len(), false)
}

/// Index just past a string or character literal starting at `start`
fn skip_literal(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '\n' | '\r' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

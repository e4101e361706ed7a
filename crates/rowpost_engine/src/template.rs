//! Minimal text templates with `{{.field}}` variables.
//!
//! Templates are compiled once and never fail to render: a missing field
//! renders as `<no value>` and an action that is not a field reference renders
//! an in-place `<template error: ...>` marker, so one bad row cannot abort a run.

use crate::Row;

/// Placeholder for a field the row does not carry.
pub const NO_VALUE: &str = "<no value>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                // Unterminated action: keep the remainder as literal text.
                break;
            };
            if open > 0 {
                push_text(&mut segments, &rest[..open]);
            }
            segments.push(parse_action(&after_open[..close]));
            rest = &after_open[close + 2..];
        }
        if !rest.is_empty() {
            push_text(&mut segments, rest);
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn render(&self, row: &Row) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(row.get(name).unwrap_or(NO_VALUE)),
                Segment::Invalid(action) => {
                    out.push_str("<template error: unsupported action \"");
                    out.push_str(action);
                    out.push_str("\">");
                }
            }
        }
        out
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Text(prev)) = segments.last_mut() {
        prev.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}

fn parse_action(raw: &str) -> Segment {
    let action = raw.trim();
    let action = action.strip_prefix('-').map(str::trim_start).unwrap_or(action);
    let action = action.strip_suffix('-').map(str::trim_end).unwrap_or(action);

    match action.strip_prefix('.') {
        Some(name) if is_identifier(name) => Segment::Field(name.to_string()),
        _ => Segment::Invalid(action.to_string()),
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

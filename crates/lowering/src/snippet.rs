// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Snippet model
//!
//! Native SQL is built as a list of segments: plain text, or an anchor
//! placeholder whose text is only known once the whole statement has been
//! walked. Anchors are resolved in a single pass by [`NativeSql::render`];
//! emitted text is never searched or patched.
//!
//! One logical ECSQL value lowers to a *snippet list*: one [`NativeSql`]
//! per physical column. A `Point3d` property yields three snippets, an
//! integer literal one.

use std::fmt;

use tracing::trace;

use crate::error::{LoweringError, LoweringResult};

/// Snippet list of one expression, one entry per physical column
pub type Snippets = Vec<NativeSql>;

/// Handle of a deferred rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(usize);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Anchor(AnchorId),
}

/// Native SQL text with unresolved anchor placeholders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NativeSql {
    segments: Vec<Segment>,
}

impl NativeSql {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment::Text(text)],
        }
    }

    pub fn anchor(id: AnchorId) -> Self {
        Self {
            segments: vec![Segment::Anchor(id)],
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(last)) => last.push_str(text),
            _ => self.segments.push(Segment::Text(text.to_string())),
        }
    }

    pub fn push_sql(&mut self, other: &NativeSql) {
        for segment in &other.segments {
            match segment {
                Segment::Text(text) => self.push_str(text),
                Segment::Anchor(id) => self.segments.push(Segment::Anchor(*id)),
            }
        }
    }

    pub fn push_anchor(&mut self, id: AnchorId) {
        self.segments.push(Segment::Anchor(id));
    }

    /// Builder form of [`NativeSql::push_str`]
    pub fn with_str(mut self, text: &str) -> Self {
        self.push_str(text);
        self
    }

    /// Builder form of [`NativeSql::push_sql`]
    pub fn with_sql(mut self, other: &NativeSql) -> Self {
        self.push_sql(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The plain text, if this contains no anchors
    pub fn as_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [] => Some(""),
            [Segment::Text(text)] => Some(text),
            _ => None,
        }
    }

    pub fn has_anchors(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Anchor(_)))
    }

    /// `(self)`
    pub fn parenthesized(&self) -> NativeSql {
        NativeSql::text("(").with_sql(self).with_str(")")
    }

    /// Concatenate `parts` separated by `separator`
    pub fn join(parts: &[NativeSql], separator: &str) -> NativeSql {
        let mut joined = NativeSql::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.push_sql(part);
        }
        joined
    }

    /// Produce the final text, substituting every anchor
    pub fn render(&self, anchors: &AnchorTable) -> LoweringResult<String> {
        let mut out = String::new();
        self.render_into(&mut out, anchors, 0)?;
        Ok(out)
    }

    fn render_into(
        &self,
        out: &mut String,
        anchors: &AnchorTable,
        depth: usize,
    ) -> LoweringResult<()> {
        if depth > anchors.len() {
            return Err(LoweringError::internal("anchor replacements form a cycle"));
        }
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Anchor(id) => {
                    let replacement = anchors.resolved(*id).ok_or_else(|| {
                        LoweringError::internal(format!("anchor {id} was never resolved"))
                    })?;
                    trace!(anchor = %id, "Substituting anchor");
                    replacement.render_into(out, anchors, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl From<String> for NativeSql {
    fn from(text: String) -> Self {
        NativeSql::text(text)
    }
}

impl From<&str> for NativeSql {
    fn from(text: &str) -> Self {
        NativeSql::text(text)
    }
}

impl fmt::Display for NativeSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => f.write_str(text)?,
                Segment::Anchor(id) => write!(f, "<anchor {id}>")?,
            }
        }
        Ok(())
    }
}

/// Select-list columns and WHERE clause of a subquery whose predicate is
/// rewritten through an anchor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapturedSelect {
    pub select_columns: Snippets,
    pub original_where: Option<NativeSql>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AnchorState {
    Reserved,
    Captured(CapturedSelect),
    Resolved(NativeSql),
}

/// Deferred rewrites of one prepare call
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    entries: Vec<AnchorState>,
}

impl AnchorTable {
    pub fn reserve(&mut self) -> AnchorId {
        self.entries.push(AnchorState::Reserved);
        AnchorId(self.entries.len() - 1)
    }

    /// Record the parts of the subquery the rewrite is built from
    pub fn capture(&mut self, id: AnchorId, captured: CapturedSelect) -> LoweringResult<()> {
        match self.entries.get_mut(id.0) {
            Some(state @ AnchorState::Reserved) => {
                *state = AnchorState::Captured(captured);
                Ok(())
            }
            _ => Err(LoweringError::internal(format!(
                "anchor {id} is not awaiting a subquery capture"
            ))),
        }
    }

    pub fn take_capture(&mut self, id: AnchorId) -> LoweringResult<CapturedSelect> {
        match self.entries.get_mut(id.0) {
            Some(state @ AnchorState::Captured(_)) => {
                match std::mem::replace(state, AnchorState::Reserved) {
                    AnchorState::Captured(captured) => Ok(captured),
                    _ => Err(LoweringError::internal("anchor state changed while taken")),
                }
            }
            _ => Err(LoweringError::internal(format!(
                "anchor {id} has no captured subquery"
            ))),
        }
    }

    pub fn resolve(&mut self, id: AnchorId, replacement: NativeSql) -> LoweringResult<()> {
        match self.entries.get_mut(id.0) {
            Some(state) if !matches!(state, AnchorState::Resolved(_)) => {
                trace!(anchor = %id, replacement = %replacement, "Resolved anchor");
                *state = AnchorState::Resolved(replacement);
                Ok(())
            }
            _ => Err(LoweringError::internal(format!(
                "anchor {id} cannot be resolved twice"
            ))),
        }
    }

    pub fn resolved(&self, id: AnchorId) -> Option<&NativeSql> {
        match self.entries.get(id.0) {
            Some(AnchorState::Resolved(sql)) => Some(sql),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Output buffer with stack-structured capture frames
#[derive(Debug, Clone)]
pub struct SqlBuffer {
    frames: Vec<NativeSql>,
}

impl Default for SqlBuffer {
    fn default() -> Self {
        Self {
            frames: vec![NativeSql::new()],
        }
    }
}

impl SqlBuffer {
    pub fn append(&mut self, sql: &NativeSql) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push_sql(sql);
        }
    }

    pub fn append_str(&mut self, text: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push_str(text);
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(NativeSql::new());
    }

    /// Pop the innermost capture frame; the root frame is never popped
    pub fn pop_frame(&mut self) -> NativeSql {
        if self.frames.len() > 1 {
            self.frames.pop().unwrap_or_default()
        } else {
            NativeSql::new()
        }
    }

    /// Number of open capture frames above the root
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Take the root frame, leaving the buffer empty
    pub fn take_root(&mut self) -> NativeSql {
        self.frames.truncate(1);
        self.frames
            .first_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

/// `[name]`
pub fn bracketed(name: &str) -> String {
    format!("[{name}]")
}

/// `[alias].[column]`
pub fn qualified_column(alias: &str, column: &str) -> String {
    format!("[{alias}].[{column}]")
}

/// Single-quoted SQL string literal with `''` escaping
pub fn quoted_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

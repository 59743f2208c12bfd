//! Decomposition store and short-code table.
//!
//! `LookupTable` holds everything one compilation run needs: the primary
//! part list per character, alternate (duplicate) definitions kept for
//! diagnostics, the memoized flattened code sequences, per-character tags,
//! and the short-code table with its derived fast-character map.
//!
//! Ingestion populates the table in a first pass over all definition files
//! (decompositions may reference characters defined later), then derivation
//! reads it. The flattened cache is filled lazily on first expansion and
//! never invalidated: definitions are closed before any code is derived.

use ahash::AHashMap;
use tracing::warn;

use crate::code::{Code, Part, Tag};
use crate::error::{Error, Result};

/// Decomposition store plus short-code table for one run.
#[derive(Debug, Default)]
pub struct LookupTable {
    parts: AHashMap<char, Vec<Part>>,
    /// Later definitions for an already-defined character. Diagnostic only,
    /// never consulted by derivation.
    alt_parts: AHashMap<char, Vec<Vec<Part>>>,
    /// Primary definitions in insertion order; drives deterministic sweeps.
    order: Vec<char>,
    flattened: AHashMap<char, Vec<Code>>,
    tags: AHashMap<char, Tag>,
    short_codes: AHashMap<Code, String>,
    fast_chars: AHashMap<char, u8>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the primary definition for `ch`. A redefinition is recorded
    /// as an alternate and warned about; the first definition wins.
    pub fn add_char_def(&mut self, ch: char, parts: Vec<Part>, tag: Option<Tag>) {
        if self.parts.contains_key(&ch) {
            warn!("'{ch}' is already defined, keeping the first definition");
            self.alt_parts.entry(ch).or_default().push(parts);
            return;
        }
        self.parts.insert(ch, parts);
        self.order.push(ch);
        if let Some(tag) = tag {
            self.tags.insert(ch, tag);
        }
    }

    /// Insert a short-code entry. When the text is exactly one character and
    /// the code is a single symbol, the character also becomes a fast
    /// character. Manual ingestion and the allocation engine both go through
    /// here so the fast-character map stays derived, never set directly.
    pub fn add_short_code(&mut self, code: Code, text: impl Into<String>) {
        let text = text.into();
        if code.len() == 1 {
            if let Some(ch) = single_char(&text) {
                self.fast_chars.insert(ch, code.slot(0));
            }
        }
        self.short_codes.insert(code, text);
    }

    /// Primary part list for `ch`, if defined.
    pub fn find(&self, ch: char) -> Option<&[Part]> {
        self.parts.get(&ch).map(Vec::as_slice)
    }

    /// Alternate (duplicate) definitions recorded for `ch`.
    pub fn alternates(&self, ch: char) -> &[Vec<Part>] {
        self.alt_parts.get(&ch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tag(&self, ch: char) -> Option<Tag> {
        self.tags.get(&ch).copied()
    }

    /// Fast (single-symbol) code for `ch`, if it has one.
    pub fn fast_char(&self, ch: char) -> Option<u8> {
        self.fast_chars.get(&ch).copied()
    }

    /// Text mapped by an exact short code.
    pub fn short_text(&self, code: &Code) -> Option<&str> {
        self.short_codes.get(code).map(String::as_str)
    }

    /// Characters with a primary definition, in definition order.
    pub fn defined_chars(&self) -> &[char] {
        &self.order
    }

    /// Short-code entries sorted by code, for deterministic emission.
    pub fn sorted_short_codes(&self) -> Vec<(Code, &str)> {
        let mut entries: Vec<(Code, &str)> = self
            .short_codes
            .iter()
            .map(|(code, text)| (*code, text.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(code, _)| *code);
        entries
    }

    /// Flatten `ch` into its literal code sequence, memoizing the result.
    ///
    /// Fails with [`Error::UndefinedChar`] when `ch` or any transitively
    /// referenced character has no definition. Recursion depth is bounded by
    /// decomposition depth; the definition graph must be acyclic (a cycle is
    /// a precondition violation, not a checked error).
    pub fn expand_char(&mut self, ch: char) -> Result<Vec<Code>> {
        if let Some(flat) = self.flattened.get(&ch) {
            return Ok(flat.clone());
        }
        let parts = self
            .parts
            .get(&ch)
            .ok_or(Error::UndefinedChar(ch))?
            .clone();
        let flat = self.expand_parts(&parts)?;
        self.flattened.insert(ch, flat.clone());
        Ok(flat)
    }

    /// Flatten a part list: fragments pass through, references substitute
    /// the referenced character's own flattened sequence.
    pub fn expand_parts(&mut self, parts: &[Part]) -> Result<Vec<Code>> {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Part::Fragment(code) => flat.push(*code),
                Part::Reference(ch) => flat.extend(self.expand_char(*ch)?),
            }
        }
        Ok(flat)
    }
}

/// The sole character of `s`, if it contains exactly one.
pub(crate) fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// True when `s` is exactly the one-character string of `ch`.
pub(crate) fn text_is_char(s: &str, ch: char) -> bool {
    single_char(s) == Some(ch)
}

//! Third-tier short-code allocation sweep.
//!
//! Given a target character set and a table already holding tier-1/2 and
//! manual tier-3 codes, the sweep walks every 3-letter code in `AAA`..`ZZZ`
//! order and assigns at most one new third-tier code per slot, writing a
//! per-group report as it goes. Collisions resolve in a fixed priority
//! order: characters already coded at the slot keep it, fast characters and
//! (under contention) characters that already hold any short code are
//! dropped, and the earliest-discovered remaining candidate wins. Everything
//! is driven by definition order and sorted code order, so two sweeps over
//! identical input produce byte-identical output.

use std::io::{BufWriter, Write};

use ahash::AHashMap;
use tracing::info;

use crate::code::Code;
use crate::error::Result;
use crate::table::{single_char, text_is_char, LookupTable};

/// Aggregate outcome of a bootstrap sweep.
#[derive(Debug, Default)]
pub struct BootstrapSummary {
    /// Newly assigned third-tier codes.
    pub assigned: usize,
    /// Characters contention left without a usable slot.
    pub missed: Vec<char>,
    /// Characters whose candidate code is a prefix of their own full code.
    pub full_only: Vec<char>,
}

struct Allocator<'a, W: Write> {
    out: BufWriter<W>,
    lookup: &'a mut LookupTable,
    /// Full code → characters sharing it, including single-character
    /// short-code entries (manually coded characters stay visible).
    code_map: AHashMap<Code, Vec<char>>,
    /// Character → its (smallest) existing short code.
    short_chars: AHashMap<char, Code>,
    /// Default third-tier code → candidates, in discovery order.
    candidates: AHashMap<Code, Vec<char>>,
    summary: BootstrapSummary,
}

/// Run the third-tier allocation sweep for `chars` against `lookup`,
/// writing the per-group report to `out` and inserting newly assigned codes
/// into the table. Returns the summary with both diagnostic lists.
pub fn l3_bootstrap<W: Write>(
    out: W,
    chars: &[char],
    lookup: &mut LookupTable,
) -> Result<BootstrapSummary> {
    let mut code_map: AHashMap<Code, Vec<char>> = AHashMap::new();
    for ch in lookup.defined_chars().to_vec() {
        let full = lookup.full_code(ch)?;
        append_unique(&mut code_map, full, ch);
    }

    let short_chars = known_short_chars(lookup);

    info!("third-tier bootstrap over {} characters", chars.len());
    let mut candidates: AHashMap<Code, Vec<char>> = AHashMap::new();
    for &ch in chars {
        if short_chars.get(&ch).is_some_and(|code| code.len() == 3) {
            // a manually set third-tier code wins over the default
            continue;
        }
        let code = lookup.default_l3_code(ch)?;
        if code.is_valid() {
            append_unique(&mut candidates, code, ch);
        }
    }

    for (code, text) in lookup.sorted_short_codes() {
        if let Some(ch) = single_char(text) {
            append_unique(&mut code_map, code, ch);
        }
    }

    let mut alloc = Allocator {
        out: BufWriter::new(out),
        lookup,
        code_map,
        short_chars,
        candidates,
        summary: BootstrapSummary::default(),
    };
    for i in b'A'..=b'Z' {
        for j in b'A'..=b'Z' {
            let mut group = Code::default();
            group.set_slot(0, i);
            group.set_slot(1, j);
            alloc.process_group(group)?;
            writeln!(alloc.out)?;
        }
    }
    info!("generated {} third-tier codes", alloc.summary.assigned);
    alloc.report_diagnostics()?;
    alloc.report_shadowed()?;
    alloc.out.flush()?;
    Ok(alloc.summary)
}

impl<W: Write> Allocator<'_, W> {
    /// One 2-letter prefix group: header, then all 26 third letters.
    fn process_group(&mut self, mut code: Code) -> Result<()> {
        let (i, j) = (code.slot(0) as char, code.slot(1) as char);
        let existing = self.lookup.short_text(&code).unwrap_or("").to_string();
        write!(self.out, "{i}{j}\t{existing}\t")?;
        for k in b'A'..=b'Z' {
            code.set_slot(2, k);
            self.process_code(code)?;
        }
        Ok(())
    }

    /// One concrete 3-letter code: emit the already-coded set, then filter
    /// candidates and assign the slot to the first survivor if it is free.
    fn process_code(&mut self, code: Code) -> Result<()> {
        let k = code.slot(2) as char;
        let coded = self.code_map.get(&code).cloned().unwrap_or_default();
        for &ch in &coded {
            write!(self.out, "{ch}{k}")?;
            if self
                .lookup
                .short_text(&code)
                .is_some_and(|text| text_is_char(text, ch))
            {
                write!(self.out, "^")?;
            }
            write!(self.out, " ")?;
        }
        let Some(mut candidates) = self.candidates.get(&code).cloned() else {
            return Ok(());
        };
        // full-code holders of this slot and fast characters never compete
        candidates.retain(|ch| !coded.contains(ch) && self.lookup.fast_char(*ch).is_none());
        let mut omitted = !coded.is_empty();
        if omitted || candidates.len() > 1 {
            // still contended: characters that already hold any short code
            // step aside
            candidates.retain(|ch| !self.short_chars.contains_key(ch));
        }
        for ch in candidates {
            let (left, right);
            if !omitted {
                (left, right) = ("", "*");
                self.lookup.add_short_code(code, ch.to_string());
                self.summary.assigned += 1;
                omitted = true;
            } else if self.lookup.full_code(ch)?.starts_with(&code) {
                (left, right) = ("[", "]");
                self.summary.full_only.push(ch);
            } else {
                (left, right) = ("(", ")");
                self.summary.missed.push(ch);
            }
            write!(self.out, "{left}{ch}{k}{right}")?;
        }
        Ok(())
    }

    fn report_diagnostics(&mut self) -> Result<()> {
        let missed: String = self.summary.missed.iter().collect();
        writeln!(
            self.out,
            "not reachable by third-tier code ({}): {missed}",
            self.summary.missed.len()
        )?;
        let full_only: String = self.summary.full_only.iter().collect();
        writeln!(
            self.out,
            "third-tier code is own full-code prefix ({}): {full_only}",
            self.summary.full_only.len()
        )?;
        Ok(())
    }

    /// Report characters reachable "by accident": a character whose full
    /// code is shared with another character holding a short code that is a
    /// strict prefix of that other character's full code.
    fn report_shadowed(&mut self) -> Result<()> {
        for ch in self.lookup.defined_chars().to_vec() {
            let full = self.lookup.full_code(ch)?;
            if full.len() < 3 {
                continue;
            }
            if self.short_chars.get(&ch) == Some(&full) {
                continue;
            }
            let sharers = match self.code_map.get(&full) {
                Some(sharers) if sharers.len() >= 2 => sharers.clone(),
                _ => continue,
            };
            for other in sharers {
                if other == ch {
                    continue;
                }
                let Some(short) = self.short_chars.get(&other).copied() else {
                    continue;
                };
                let other_full = self.lookup.full_code(other)?;
                if short.len() < other_full.len() && other_full.starts_with(&short) {
                    writeln!(self.out, "{short} {other}\t{other_full} {ch}")?;
                }
            }
        }
        Ok(())
    }
}

fn append_unique(map: &mut AHashMap<Code, Vec<char>>, code: Code, ch: char) {
    let entry = map.entry(code).or_default();
    if !entry.contains(&ch) {
        entry.push(ch);
    }
}

/// Characters whose short-code text is exactly themselves, mapped to that
/// code. Codes are visited in sorted order and the first (smallest) wins, so
/// the result does not depend on table iteration order.
fn known_short_chars(lookup: &LookupTable) -> AHashMap<char, Code> {
    let mut map = AHashMap::new();
    for (code, text) in lookup.sorted_short_codes() {
        if let Some(ch) = single_char(text) {
            map.entry(ch).or_insert(code);
        }
    }
    map
}

//! Full, brief and default third-tier code derivation.
//!
//! All three derivations work on the flattened part-code sequence of a
//! character (see [`LookupTable::expand_char`]) plus contextual facts from
//! the table: whether the character is a fast character, whether a short
//! code already occupies the accumulated code, and the character's tag.

use crate::code::{Code, Tag};
use crate::error::Result;
use crate::table::{text_is_char, LookupTable};

impl LookupTable {
    /// Canonical full code for `ch`: 1-4 symbols, reproducible.
    ///
    /// Branches on the flattened part count and, for single-part
    /// characters, on the fragment length:
    ///
    /// - 1 part, length 1: pad `A` unless `ch` is a fast character; pad a
    ///   second `A` when the padded code is already a short code for other
    ///   text, and a third when `ch` is additionally a sub part.
    /// - 1 part, length 2: when the fragment is already a short code for
    ///   other text, sub parts pad `AA`, everything else pads one `A`.
    /// - 1 part, length 3: sub parts pad one `A`.
    /// - 2 parts: part 1 entire, then part 2 capped to 4; a 2-symbol result
    ///   gets the `VV` filler.
    /// - 3 parts: below 3 symbols after part 1, insert part 2's first
    ///   symbol; then part 3 capped to 4.
    /// - 4+ parts: part 1 entire, then first symbols of part 2 and of the
    ///   second-to-last part as needed to reach 3, then the last part
    ///   capped to 4.
    pub fn full_code(&mut self, ch: char) -> Result<Code> {
        let parts = self.expand_char(ch)?;
        let mut code = Code::default();
        code.extend_capped(parts[0].as_bytes());
        let n = code.len();
        match parts.len() {
            1 => match n {
                1 => {
                    if self.fast_char(ch).is_none() {
                        code.push(b'A');
                        if self.short_collides(&code, ch) {
                            code.push(b'A');
                            if self.tag(ch) == Some(Tag::SubPart) {
                                code.push(b'A');
                            }
                        }
                    }
                }
                2 => {
                    if self.short_collides(&code, ch) {
                        match self.tag(ch) {
                            Some(Tag::SubPart) => code.extend_capped(b"AA"),
                            _ => code.push(b'A'),
                        }
                    }
                }
                3 => {
                    if self.tag(ch) == Some(Tag::SubPart) {
                        code.push(b'A');
                    }
                }
                _ => {}
            },
            2 => {
                code.extend_capped(parts[1].as_bytes());
                if code.len() == 2 {
                    code.extend_capped(b"VV");
                }
            }
            3 => {
                if n < 3 {
                    code.push(parts[1].slot(0));
                }
                code.extend_capped(parts[2].as_bytes());
            }
            l => {
                if n == 1 {
                    code.push(parts[1].slot(0));
                }
                if n <= 2 {
                    code.push(parts[l - 2].slot(0));
                }
                code.extend_capped(parts[l - 1].as_bytes());
            }
        }
        Ok(code)
    }

    /// True when `code` is already taken by a short-code entry whose text is
    /// not `ch` itself.
    fn short_collides(&self, code: &Code, ch: char) -> bool {
        self.short_text(code)
            .is_some_and(|text| !text_is_char(text, ch))
    }

    /// Fast two-symbol approximation of the full code.
    ///
    /// Fast characters get their fast symbol plus the `V` filler. Everyone
    /// else gets the first symbol of fragment 1 paired with the fragment's
    /// second symbol, the `A` filler for single-symbol fragments, or the
    /// first symbol of fragment 2 when there is one.
    pub fn brief_code(&mut self, ch: char) -> Result<[u8; 2]> {
        if let Some(fast) = self.fast_char(ch) {
            return Ok([fast, b'V']);
        }
        let parts = self.expand_char(ch)?;
        let first = parts[0];
        let second = if parts.len() == 1 {
            if first.len() == 1 {
                b'A'
            } else {
                first.slot(1)
            }
        } else {
            parts[1].slot(0)
        };
        Ok([first.slot(0), second])
    }

    /// Candidate third-tier code for `ch`, independent of any existing
    /// short-code assignment. An invalid (empty) result means the character
    /// has no usable default.
    ///
    /// - 1 part: the first three symbols, when the fragment has at least 3.
    /// - 2 parts: first symbol of each part, then part 2's second symbol,
    ///   or the `V` filler when part 1 has no second symbol either, or no
    ///   usable default at all.
    /// - 3+ parts: first symbol of each of the first three parts.
    pub fn default_l3_code(&mut self, ch: char) -> Result<Code> {
        let parts = self.expand_char(ch)?;
        let mut code = Code::default();
        match parts.len() {
            1 => {
                let first = parts[0].as_bytes();
                if first.len() >= 3 {
                    code.extend_capped(&first[..3]);
                }
            }
            2 => {
                code.push(parts[0].slot(0));
                code.push(parts[1].slot(0));
                let b = parts[1].slot(1);
                if b != 0 {
                    code.push(b);
                } else if parts[0].slot(1) == 0 {
                    code.push(b'V');
                } else {
                    code = Code::default();
                }
            }
            _ => {
                code.push(parts[0].slot(0));
                code.push(parts[1].slot(0));
                code.push(parts[2].slot(0));
            }
        }
        Ok(code)
    }
}

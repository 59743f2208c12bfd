//! Tab-separated record parsing for the table compiler.
//!
//! Three record formats share one line reader: character definitions
//! (`char<TAB>components[<TAB>tag]`), short codes (`text<TAB>code`) and
//! third-tier target characters (one per line). Blank lines and `#`
//! comments are skipped everywhere; a malformed record aborts its file with
//! `file:line` context.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use libxingma_core::{Code, LookupTable, Part, Tag};

/// Read `path` line by line, handing the tab-separated fields of each
/// record to `callback`. Callback errors are rethrown with file and line
/// context and stop the file immediately.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    mut callback: impl FnMut(&[&str]) -> Result<()>,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        callback(&fields).with_context(|| format!("{}:{}", path.display(), idx + 1))?;
    }
    Ok(())
}

/// Ingest a short-code table: `text<TAB>code`, code 1-3 symbols.
pub fn parse_short_code_file<P: AsRef<Path>>(path: P, lookup: &mut LookupTable) -> Result<()> {
    parse_file(path, |fields| {
        if fields.len() < 2 {
            bail!("expected at least 2 fields");
        }
        let (text, code) = (fields[0], fields[1]);
        if code.is_empty() || code.len() >= 4 {
            bail!("invalid code {code:?}; short codes are 1-3 symbols");
        }
        lookup.add_short_code(Code::new(code), text);
        Ok(())
    })
}

/// Ingest a character-definition file:
/// `char<TAB>space-separated components[<TAB>tag]`.
pub fn parse_char_def_file<P: AsRef<Path>>(path: P, lookup: &mut LookupTable) -> Result<()> {
    parse_file(path, |fields| {
        if fields.len() < 2 {
            bail!("expected at least 2 fields");
        }
        let ch = one_char(fields[0]).context("definition must name a single character")?;
        let mut parts = Vec::new();
        for token in fields[1].split(' ') {
            if token.is_empty() || token.len() > 4 {
                bail!("component {token:?} must be 1-4 bytes");
            }
            let part = Part::parse(token).with_context(|| {
                format!("component {token:?} is neither a code fragment nor a character")
            })?;
            parts.push(part);
        }
        if parts.is_empty() {
            bail!("expected at least 1 component");
        }
        let tag = fields.get(2).and_then(|field| Tag::parse(field));
        lookup.add_char_def(ch, parts, tag);
        Ok(())
    })
}

/// Read the third-tier bootstrap target set: one character per line.
pub fn parse_l3_targets<P: AsRef<Path>>(path: P) -> Result<Vec<char>> {
    let mut chars = Vec::new();
    parse_file(path, |fields| {
        let ch = one_char(fields[0]).context("third-tier targets must be single characters")?;
        chars.push(ch);
        Ok(())
    })?;
    Ok(chars)
}

fn one_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn char_defs_with_tags_and_comments() {
        let path = temp_file(
            "xingma_parse_defs.txt",
            "# comment\n\n木\tSS\n林\t木 木\tA\n森\t木 木 木\tAAA\n",
        );
        let mut lookup = LookupTable::new();
        parse_char_def_file(&path, &mut lookup).unwrap();
        assert_eq!(lookup.defined_chars().len(), 3);
        assert_eq!(lookup.tag('木'), None);
        assert_eq!(lookup.tag('林'), Some(Tag::MainPart));
        assert_eq!(lookup.tag('森'), Some(Tag::SubPart));
        assert_eq!(lookup.expand_char('森').unwrap().len(), 3);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_definition_reports_file_and_line() {
        let path = temp_file("xingma_parse_bad.txt", "木\tSS\n好坏\tAB\n");
        let mut lookup = LookupTable::new();
        let err = parse_char_def_file(&path, &mut lookup).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("xingma_parse_bad.txt:2"), "got: {chain}");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn oversized_component_is_rejected() {
        let path = temp_file("xingma_parse_part.txt", "木\tABCDE\n");
        let mut lookup = LookupTable::new();
        assert!(parse_char_def_file(&path, &mut lookup).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn short_codes_reject_four_symbols() {
        let good = temp_file("xingma_parse_short.txt", "张\tZ\n章\tZH\n");
        let mut lookup = LookupTable::new();
        parse_short_code_file(&good, &mut lookup).unwrap();
        assert_eq!(lookup.fast_char('张'), Some(b'Z'));
        assert_eq!(lookup.fast_char('章'), None);
        let _ = std::fs::remove_file(good);

        let bad = temp_file("xingma_parse_short_bad.txt", "错\tABCD\n");
        let mut lookup = LookupTable::new();
        assert!(parse_short_code_file(&bad, &mut lookup).is_err());
        let _ = std::fs::remove_file(bad);
    }

    #[test]
    fn l3_targets_are_single_characters() {
        let path = temp_file("xingma_parse_l3.txt", "甲\n乙\n");
        assert_eq!(parse_l3_targets(&path).unwrap(), vec!['甲', '乙']);
        let _ = std::fs::remove_file(path);

        let bad = temp_file("xingma_parse_l3_bad.txt", "甲乙\n");
        assert!(parse_l3_targets(&bad).is_err());
        let _ = std::fs::remove_file(bad);
    }
}

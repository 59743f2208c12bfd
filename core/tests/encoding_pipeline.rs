// End-to-end pipeline test: ingest a small decomposition set plus a manual
// short-code table, derive full and brief codes, run the third-tier
// bootstrap, and check the resulting table and report.
//
// Mirrors the real compiler flow: definitions land first (references may
// point at characters defined later), then derivation, then allocation.

use libxingma_core::{l3_bootstrap, Code, LookupTable, Part, Tag};

fn parts(tokens: &[&str]) -> Vec<Part> {
    tokens.iter().map(|t| Part::parse(t).unwrap()).collect()
}

fn build_table() -> LookupTable {
    let mut table = LookupTable::new();
    // 林 and 森 are defined before the 木 they reference
    table.add_char_def('林', parts(&["木", "木"]), None);
    table.add_char_def('森', parts(&["木", "木", "木"]), Some(Tag::MainPart));
    table.add_char_def('木', parts(&["SS"]), None);
    table.add_char_def('一', parts(&["A"]), None);
    table.add_char_def('万', parts(&["W"]), None);
    table.add_char_def('范', parts(&["AQ", "PP"]), None);
    table.add_short_code(Code::new("ZH"), "张");
    table.add_short_code(Code::new("W"), "万");
    table
}

#[test]
fn full_codes_from_forward_references() {
    let mut table = build_table();
    assert_eq!(table.full_code('木').unwrap(), Code::new("SS"));
    assert_eq!(table.full_code('林').unwrap(), Code::new("SSSS"));
    assert_eq!(table.full_code('森').unwrap(), Code::new("SSSS"));
    assert_eq!(table.full_code('一').unwrap(), Code::new("AA"));
    assert_eq!(table.full_code('范').unwrap(), Code::new("AQPP"));
    // fast character keeps its single symbol
    assert_eq!(table.full_code('万').unwrap(), Code::new("W"));
}

#[test]
fn full_codes_are_valid_and_bounded() {
    let mut table = build_table();
    for &ch in table.defined_chars().to_vec().iter() {
        let code = table.full_code(ch).unwrap();
        assert!(code.is_valid(), "full code for {ch} must be valid");
        assert!((1..=4).contains(&code.len()));
        let again = table.full_code(ch).unwrap();
        assert_eq!(code, again, "derivation for {ch} must be reproducible");
    }
}

#[test]
fn brief_codes() {
    let mut table = build_table();
    assert_eq!(table.brief_code('一').unwrap(), [b'A', b'A']);
    assert_eq!(table.brief_code('木').unwrap(), [b'S', b'S']);
    assert_eq!(table.brief_code('林').unwrap(), [b'S', b'S']);
    assert_eq!(table.brief_code('万').unwrap(), [b'W', b'V']);
}

#[test]
fn two_symbol_short_code_is_not_fast() {
    let table = build_table();
    assert_eq!(table.fast_char('张'), None);
    assert_eq!(table.fast_char('万'), Some(b'W'));
}

#[test]
fn bootstrap_assigns_first_discovered_candidate() {
    let mut table = build_table();
    let mut report = Vec::new();
    let summary = l3_bootstrap(&mut report, &['林', '森'], &mut table).unwrap();
    let report = String::from_utf8(report).unwrap();

    // both default to SSS; 林 is discovered first and takes the slot
    assert_eq!(summary.assigned, 1);
    assert_eq!(table.short_text(&Code::new("SSS")), Some("林"));
    assert!(report.contains("林S*"));
    // 森 loses the slot; SSS is a prefix of its own full code SSSS
    assert_eq!(summary.full_only, vec!['森']);
    assert!(report.contains("[森S]"));

    // the new entry flows into the sorted dump next to the manual ones
    let dump = table.sorted_short_codes();
    let codes: Vec<String> = dump.iter().map(|(code, _)| code.to_string()).collect();
    assert_eq!(codes, vec!["SSS", "W", "ZH"]);
}

#[test]
fn bootstrap_report_is_deterministic() {
    let run = || {
        let mut table = build_table();
        let mut report = Vec::new();
        l3_bootstrap(&mut report, &['林', '森', '范'], &mut table).unwrap();
        String::from_utf8(report).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn bootstrap_fails_on_undefined_target() {
    let mut table = build_table();
    let mut sink = Vec::<u8>::new();
    let err = l3_bootstrap(&mut sink, &['无'], &mut table).unwrap_err();
    assert!(err.to_string().contains('无'));
}

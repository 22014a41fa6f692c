use finreport::sections::{parse, Section};

fn sec(title: &str, content: &str) -> Section {
    Section {
        title: title.into(),
        content: content.into(),
    }
}

#[test]
fn no_headings_yields_nothing() {
    assert!(parse("").is_empty());
    assert!(parse("just text\nmore text\n").is_empty());
    assert!(parse("# Title\n### Sub\n").is_empty());
}

#[test]
fn accumulates_content_per_heading() {
    let got = parse("## A\nfoo\nbar\n## B\nbaz\n");
    assert_eq!(got, vec![sec("A", "foo\nbar\n"), sec("B", "baz\n")]);
}

#[test]
fn discards_leading_content() {
    let got = parse("ignored\n## A\nfoo\n");
    assert_eq!(got, vec![sec("A", "foo\n")]);
    assert!(got.iter().all(|s| !s.title.contains("ignored") && !s.content.contains("ignored")));
}

#[test]
fn section_count_matches_marker_count() {
    let md = "intro\n## One\n\n## \n## One\ntext\n\n\nmore\n## Three";
    let markers = md.split('\n').filter(|l| l.starts_with("## ")).count();
    let got = parse(md);
    assert_eq!(got.len(), markers);
    assert_eq!(got[0], sec("One", ""));
    assert_eq!(got[1], sec("", ""));
    assert_eq!(got[2], sec("One", "text\nmore\n"));
    assert_eq!(got[3], sec("Three", ""));
}

#[test]
fn blank_lines_are_dropped_and_titles_trimmed() {
    let got = parse("##    Padded Title   \n\n   \nline\n");
    assert_eq!(got, vec![sec("Padded Title", "line\n")]);
}

#[test]
fn content_lines_keep_their_indentation() {
    let got = parse("## Table\n| a | b |\n  - nested\n");
    assert_eq!(got[0].content, "| a | b |\n  - nested\n");
}

#[test]
fn parsing_is_repeatable() {
    let md = "## Summary\nGood year\n## Outlook\nPositive\n";
    assert_eq!(parse(md), parse(md));
}

#[test]
fn crlf_input_keeps_carriage_returns_in_content() {
    let got = parse("## A\r\nx\r\n");
    assert_eq!(got, vec![sec("A", "x\r\n")]);
}

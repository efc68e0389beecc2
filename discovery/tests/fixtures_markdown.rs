use std::fs;
use std::path::PathBuf;

use flag_completions_core::{ExtractionOutcome, TARGET_SECTION_HEADING, validate_items};
use flag_completions_discovery::parse_markdown;

#[test]
fn test_rg_fixture_extracts_flags_in_order() {
    let markdown = fixture("rg-man.md");
    let scan = parse_markdown(&markdown, TARGET_SECTION_HEADING);

    let labels: Vec<&str> = scan.items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "-e",
            "--regexp",
            "-f",
            "--file",
            "-s",
            "--case-sensitive",
            "-i",
            "--ignore-case",
            "-.",
            "--hidden",
            "--max-depth",
            "-d",
        ]
    );
    assert_eq!(scan.outcome(), ExtractionOutcome::Found(12));
    assert_eq!(scan.flag_lines, 6);
    assert_eq!(scan.terminating_heading.as_deref(), Some("# EXIT STATUS"));
    assert!(validate_items(&scan.items).is_empty());
}

#[test]
fn test_rg_fixture_documentation_text() {
    let markdown = fixture("rg-man.md");
    let scan = parse_markdown(&markdown, TARGET_SECTION_HEADING);

    let regexp = scan.items.iter().find(|i| i.label == "--regexp").unwrap();
    assert_eq!(
        regexp.documentation.value,
        "*-e* *PATTERN*, *\\--regexp*=*PATTERN*\n\n\
         A pattern to search for. This option can be provided multiple times,\n\
         where all patterns given are searched.\n"
    );

    let max_depth = scan.items.iter().find(|i| i.label == "-d").unwrap();
    assert_eq!(
        max_depth.documentation.value,
        "*\\--max-depth*=*NUM*, *-d* *NUM*\n\n\
         This flag limits the depth of directory traversal to *NUM* levels\n\
         beyond the paths given.\n\
         \n\
         A value of *0* only searches the explicitly given paths themselves.\n"
    );
}

#[test]
fn test_rg_fixture_short_and_long_share_documentation() {
    let markdown = fixture("rg-man.md");
    let scan = parse_markdown(&markdown, TARGET_SECTION_HEADING);

    let short = scan.items.iter().find(|i| i.label == "-.").unwrap();
    let long = scan.items.iter().find(|i| i.label == "--hidden").unwrap();
    assert_eq!(short.documentation, long.documentation);
}

#[test]
fn test_rg_fixture_ignores_other_sections() {
    let markdown = fixture("rg-man.md");
    let scan = parse_markdown(&markdown, TARGET_SECTION_HEADING);

    assert!(scan.items.iter().all(|i| i.label != "-z" && i.label != "--verbose"));
    assert!(
        scan.items
            .iter()
            .all(|i| !i.documentation.value.contains("Not an option")
                && !i.documentation.value.contains("outside the options"))
    );
}

#[test]
fn test_lowercase_heading_is_not_found() {
    let markdown = fixture("no-options.md");
    let scan = parse_markdown(&markdown, TARGET_SECTION_HEADING);
    assert_eq!(scan.outcome(), ExtractionOutcome::SectionNotFound);
    assert!(scan.items.is_empty());
}

#[test]
fn test_fixture_scan_is_idempotent() {
    let markdown = fixture("rg-man.md");
    assert_eq!(
        parse_markdown(&markdown, TARGET_SECTION_HEADING),
        parse_markdown(&markdown, TARGET_SECTION_HEADING)
    );
}

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

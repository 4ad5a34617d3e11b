/*!
 * Tests for similarity scoring, marker cleaning and paragraph alignment
 */

use wordbridge::alignment::{AlignedParagraph, AlignmentTable, find_best_paragraph};
use wordbridge::alignment::paragraph::PARAGRAPH_MIN_SCORE;
use wordbridge::text::{clean_markers, similarity};

#[test]
fn test_similarity_identicalStrings_shouldBeOne() {
    for text in ["a", "ab", "night", "Привет, мир", "the cat sat on the mat"] {
        assert_eq!(similarity(text, text), 1.0, "similarity of {:?} with itself", text);
    }
}

#[test]
fn test_similarity_emptyInput_shouldBeZero() {
    for other in ["", "a", "night", "кот"] {
        assert_eq!(similarity("", other), 0.0);
        assert_eq!(similarity(other, ""), 0.0);
    }
}

#[test]
fn test_similarity_shouldBeSymmetric() {
    let pairs = [
        ("night", "nacht"),
        ("context", "contact"),
        ("the cat sat", "the hat sat down"),
        ("a", "ab"),
    ];
    for (a, b) in pairs {
        assert_eq!(similarity(a, b), similarity(b, a), "{:?} vs {:?}", a, b);
    }
}

#[test]
fn test_similarity_nightNacht_shouldShareOneBigram() {
    assert!((similarity("night", "nacht") - 0.25).abs() < 1e-9);
}

#[test]
fn test_similarity_singleCharsDiffering_shouldBeZero() {
    assert_eq!(similarity("a", "b"), 0.0);
}

#[test]
fn test_cleanMarkers_shouldBeFixedPoint() {
    let samples = [
        "Plain text.",
        "{% if has_mapping %}Chapter one{% endif %}",
        "{{% if has_mapping %}}Text{{% endif %}}",
        "[{% if x %}]Hello[{% endif %}] world",
        "{{ title }} and {{% if",
        "{{% endif %{% x %}}",
        "  [% block %]  ",
    ];
    for sample in samples {
        let once = clean_markers(sample);
        assert_eq!(clean_markers(&once), once, "cleaning {:?} twice", sample);
    }
}

#[test]
fn test_cleanMarkers_shouldRemoveTemplateDebris() {
    assert_eq!(clean_markers("{% if has_mapping %}Chapter one{% endif %}"), "Chapter one");
    assert_eq!(clean_markers("  Chapter %}}"), "Chapter");
}

fn table() -> Vec<AlignedParagraph> {
    vec![
        AlignedParagraph::new("The cat sat on the mat.", "Кот сидел на коврике."),
        AlignedParagraph::new("It was a dark and stormy night.", "Была тёмная и бурная ночь."),
    ]
}

#[test]
fn test_findBestParagraph_confidentContext_shouldReturnTarget() {
    let best = find_best_paragraph("  it was a DARK and stormy night. ", &table(), PARAGRAPH_MIN_SCORE).unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.target, "Была тёмная и бурная ночь.");
    assert_eq!(best.score, 1.0);
}

#[test]
fn test_findBestParagraph_everyEntryBelowThreshold_shouldReturnNone() {
    assert!(find_best_paragraph("Completely unrelated words here", &table(), PARAGRAPH_MIN_SCORE).is_none());
    assert!(find_best_paragraph("anything", &[], PARAGRAPH_MIN_SCORE).is_none());
}

#[test]
fn test_alignmentTable_fromParallelTexts_shouldPairByOrdinal() {
    let source = "First paragraph.\n\n\n  Second paragraph.  \n\nThird only in source.";
    let target = "Первый абзац.\n\nВторой абзац.";

    let table = AlignmentTable::from_parallel_texts(source, target);

    assert_eq!(table.len(), 2);
    assert_eq!(table.entries()[1], AlignedParagraph::new("Second paragraph.", "Второй абзац."));
}

#[test]
fn test_alignmentTable_fromJson_indexedShape_shouldOrderNumerically() {
    let json = r#"{
        "10": {"english": "Eleventh.", "russian": "Одиннадцатый."},
        "2": {"english": "Third.", "russian": "Третий."},
        "0": {"english": "First.", "russian": "Первый."}
    }"#;

    let table = AlignmentTable::from_json(json).unwrap();
    let sources: Vec<&str> = table.entries().iter().map(|entry| entry.source.as_str()).collect();

    assert_eq!(sources, vec!["First.", "Third.", "Eleventh."]);
}

#[test]
fn test_alignmentTable_fromJson_malformed_shouldFail() {
    assert!(AlignmentTable::from_json("[1, 2, 3]").is_err());
    assert!(AlignmentTable::from_json(r#"{"first": {"source": "a", "target": "b"}}"#).is_err());
}

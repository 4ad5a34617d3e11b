/*!
 * Tests for resolving clicked words from positioned text fragments
 */

use wordbridge::alignment::geometry::{page_text, word_at_with_padding};
use wordbridge::alignment::{TextFragment, word_at};

fn hello_world() -> Vec<TextFragment> {
    vec![TextFragment::new("hello world", 0.0, 20.0, 100.0, 10.0)]
}

#[test]
fn test_wordAt_clickInsideSecondWord_shouldReturnWorld() {
    let hit = word_at(&hello_world(), 80.0, 15.0).unwrap();

    assert_eq!(hit.word, "world");
    assert_eq!(hit.fragment_index, 0);

    let char_width = 100.0 / 11.0;
    assert!((hit.bounding_box.left - 6.0 * char_width).abs() < 1e-9);
    assert!((hit.bounding_box.width - 5.0 * char_width).abs() < 1e-9);
    assert_eq!(hit.bounding_box.top, 10.0);
    assert_eq!(hit.bounding_box.height, 10.0);
}

#[test]
fn test_wordAt_estimateBeyondText_shouldReturnNone() {
    // Inside the right padding, past the last character
    assert!(word_at(&hello_world(), 105.0, 15.0).is_none());

    // Inside the left padding, before the first character
    let shifted = vec![TextFragment::new("hello world", 50.0, 20.0, 100.0, 10.0)];
    assert!(word_at(&shifted, 45.0, 15.0).is_none());
}

#[test]
fn test_wordAt_invalidCoordinates_shouldReturnNone() {
    let fragments = hello_world();
    assert!(word_at(&fragments, -1.0, 15.0).is_none());
    assert!(word_at(&fragments, 10.0, -0.5).is_none());
    assert!(word_at(&fragments, f64::NAN, 15.0).is_none());
    assert!(word_at(&fragments, 10.0, f64::INFINITY).is_none());
}

#[test]
fn test_wordAt_clickOnSpace_shouldReturnNone() {
    assert!(word_at(&hello_world(), 50.0, 15.0).is_none());
}

#[test]
fn test_wordAt_clickOutsideEveryFragment_shouldReturnNone() {
    assert!(word_at(&hello_world(), 50.0, 200.0).is_none());
    assert!(word_at(&[], 10.0, 10.0).is_none());
}

#[test]
fn test_wordAt_apostrophesAndQuotes_shouldKeepContractionsOnly() {
    let fragments = vec![TextFragment::new("don't stop", 0.0, 20.0, 100.0, 10.0)];
    assert_eq!(word_at(&fragments, 25.0, 15.0).unwrap().word, "don't");

    let fragments = vec![TextFragment::new("say 'quoted' now", 0.0, 20.0, 160.0, 10.0)];
    assert_eq!(word_at(&fragments, 55.0, 15.0).unwrap().word, "quoted");
}

#[test]
fn test_wordAt_overlappingFragments_shouldUseFirstHit() {
    let fragments = vec![
        TextFragment::new("first", 0.0, 20.0, 50.0, 10.0),
        TextFragment::new("second", 0.0, 20.0, 60.0, 10.0),
    ];

    let hit = word_at(&fragments, 20.0, 15.0).unwrap();
    assert_eq!(hit.word, "first");
    assert_eq!(hit.fragment_index, 0);
}

#[test]
fn test_wordAtWithPadding_zeroPadding_shouldRequireExactHit() {
    let fragments = hello_world();
    assert!(word_at_with_padding(&fragments, 5.0, 21.0, 0.0).is_none());
    assert_eq!(word_at_with_padding(&fragments, 5.0, 19.0, 0.0).unwrap().word, "hello");
}

#[test]
fn test_sanitized_shouldStripMarkersBeforeLocating() {
    let fragment = TextFragment::sanitized("{% if has_mapping %}hello", 0.0, 20.0, 50.0, 10.0);
    assert_eq!(fragment.text, "hello");
    assert_eq!(page_text(&[fragment, TextFragment::new("world", 60.0, 20.0, 50.0, 10.0)]), "hello world");
}

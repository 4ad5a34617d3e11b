/*!
 * Tests for the cross-text matcher cascade
 */

use wordbridge::alignment::{MatchQuery, MatchSettings, MatchStrategy, Matcher, locate};

#[test]
fn test_locate_noStructuralOverlap_shouldReturnNoMatch() {
    let result = locate("cat", "the cat sat", "кот сидел");
    assert!(!result.matched);
    assert_eq!(result.strategy, None);
}

#[test]
fn test_locate_literalInsideWindow_shouldReturnItsOffset() {
    let target = "Вчера в Paris было солнечно";
    let result = locate("Paris", "Yesterday Paris was sunny", target);

    assert!(result.matched);
    assert_eq!(result.strategy, Some(MatchStrategy::WindowExact));
    assert_eq!(result.start_index, target.find("Paris").unwrap());
    assert_eq!(&target[result.span().unwrap()], "Paris");
}

#[test]
fn test_locate_lowercaseInsideWindow_shouldStillMatch() {
    let target = "Вчера в paris было солнечно";
    let result = locate("Paris", "Yesterday Paris was sunny", target);

    assert!(result.matched);
    assert_eq!(result.strategy, Some(MatchStrategy::WindowFuzzy));
    assert_eq!(result.start_index, target.find("paris").unwrap());
}

#[test]
fn test_locate_caseMismatchFarFromProjection_shouldReachWholeWordStrategy() {
    let context = "Paris is lovely in spring and in autumn too";
    let target = "Весной и осенью здесь очень красиво, говорят про город paris";

    let result = locate("Paris", context, target);

    assert!(result.matched);
    assert_eq!(result.strategy, Some(MatchStrategy::WholeWord));
    assert_eq!(result.start_index, target.find("paris").unwrap());
    assert_eq!(result.char_index(target), Some(55));
}

#[test]
fn test_locate_literalCutByWindowEdge_shouldScoreVisiblePart() {
    let context = "We walked from the station to the old museum yesterday";
    let target = "Вчера мы шли от вокзала до старого museum пешком";

    // window is " старого museu"
    let result = locate("museum", context, target);

    assert_eq!(result.strategy, Some(MatchStrategy::WindowFuzzy));
    assert_eq!(result.matched_text, "museu");
    assert_eq!(result.start_index, target.find("museum").unwrap());
}

#[test]
fn test_locate_windowFuzzy_shouldOnlyScoreTextInsideWindow() {
    let target = format!("londxx london {}", "ж".repeat(46));

    // 60 chars, radius 9: the window is "londxx lo"
    let result = locate("london", "london zzzz zzzz", &target);

    assert_eq!(result.strategy, Some(MatchStrategy::WindowFuzzy));
    assert_eq!(result.start_index, 0);
    assert_eq!(result.matched_text, "londxx");
}

#[test]
fn test_locateQuery_knownTranslation_shouldFindItInAlignedSentence() {
    let matcher = Matcher::default();
    let query = MatchQuery::new("cat", "the cat sat").with_target_word("кот");

    let result = matcher.locate_query(&query, "кот сидел");

    assert!(result.matched);
    assert_eq!(result.strategy, Some(MatchStrategy::SentenceExact));
    assert_eq!(result.start_index, 0);
    assert_eq!(result.matched_text, "кот");
}

#[test]
fn test_locate_zeroWindow_shouldSkipToLaterStrategies() {
    let matcher = Matcher::new(MatchSettings {
        window_ratio: 0.0,
        ..MatchSettings::default()
    });
    let target = "Вчера в Paris было солнечно";

    let result = matcher.locate("Paris", "Yesterday Paris was sunny", target);

    assert_eq!(result.strategy, Some(MatchStrategy::SentenceExact));
    assert_eq!(result.start_index, target.find("Paris").unwrap());
}

#[test]
fn test_locate_strictFallbackThreshold_shouldRejectWeakCandidates() {
    let target = "Сегодня мы видели Londres вдалеке";
    assert!(locate("London", "", target).matched);

    let strict = Matcher::new(MatchSettings {
        fallback_min_score: 30,
        ..MatchSettings::default()
    });
    assert!(!strict.locate("London", "", target).matched);
}

#[test]
fn test_locate_shortWords_shouldOnlyMatchExactly() {
    let result = locate("sat", "", "they sit, then satisfied");
    assert!(!result.matched);

    let result = locate("sit", "", "they sit, then satisfied");
    assert_eq!(result.strategy, Some(MatchStrategy::WholeWord));
    assert_eq!(result.start_index, 5);
}

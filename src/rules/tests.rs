use crate::build::*;
use crate::rules::english;
use crate::{FoldError, FoldingDictionary, Lookup, LookupContext, Options, Outline, StenoDictionary, Translator};

fn outline(steno: &str) -> Outline {
    Outline::from_steno(steno).unwrap()
}

fn translator(entries: &[(&str, &str)]) -> Translator {
    let host = StenoDictionary::from_entries(entries.iter().copied()).unwrap();
    let folding = FoldingDictionary::english(Options::default()).unwrap();
    Translator::new().with(host).with(folding)
}

fn translate(translator: &Translator, steno: &str) -> Option<String> {
    let mut context = LookupContext::new();
    translator.lookup(&outline(steno), &mut context)
}

#[test]
fn english_examples_matching() {
    let translator = translator(&[
        ("TPHO", "no"),
        ("KAT", "cat"),
        ("TEFT", "test"),
        ("-Z", "{plural}"),
        ("-G", "{^ing}"),
        ("-D", "{^ed}"),
    ]);

    // (expected, outline)
    let cases: Vec<(&str, &str)> = vec![
        ("no {plural}", "TPHOZ"),
        ("no {plural}", "TPHO/-Z"),
        ("cat {plural}", "KATZ"),
        ("test {^ing}", "TEFGT"),
        ("test {^ings}", "TEFGTZ"),
        ("test {^ed}", "TEFTD"),
        ("{-|}cat", "#KAT"),
        ("{-|}cat {plural}", "#KATZ"),
    ];

    for (expected, steno) in cases {
        assert_eq!(translate(&translator, steno).as_deref(), Some(expected), "outline {steno}");
    }
}

#[test]
fn english_examples_not_matching() {
    let translator = translator(&[("TPHO", "no"), ("-Z", "{plural}"), ("-D", "{^ed}")]);

    for steno in ["KATZ", "KAT/-Z", "TPHO/KAT", "/TPHOZ", "TPHO/TPHO/TPHO/TPHO/TPHO/TPHO/TPHO/TPHOZ/-Z"] {
        assert_eq!(translate(&translator, steno), None, "outline {steno}");
    }
}

#[test]
fn past_tense_falls_back_to_literal_suffix() {
    let translator = translator(&[("TEFT", "test")]);
    assert_eq!(translate(&translator, "TEFTD").as_deref(), Some("test{^ed}"));
}

#[test]
fn shorter_outline_blocks_non_preferring_rules() {
    let translator = translator(&[("TEFT", "test"), ("-D", "{^ed}")]);
    assert_eq!(translate(&translator, "TEFT/-D"), None);

    let past = when(last_chord().folds("-D")).then([unfold_suffix()]).unwrap().preferring_folds();
    let host = StenoDictionary::from_entries([("TEFT", "test"), ("-D", "{^ed}")]).unwrap();
    let translator = Translator::new().with(host).with(FoldingDictionary::with_rules(Options::default(), [past]));
    assert_eq!(translate(&translator, "TEFT/-D").as_deref(), Some("test {^ed}"));
}

#[test]
fn shorter_outline_check_can_be_disabled() {
    let host = StenoDictionary::from_entries([("TEFT", "test"), ("-D", "{^ed}")]).unwrap();
    let options = Options { check_shorter_outlines: false, ..Options::default() };
    let translator = Translator::new().with(host).with(FoldingDictionary::english(options).unwrap());
    assert_eq!(translate(&translator, "TEFT/-D").as_deref(), Some("test {^ed}"));
}

#[test]
fn unloaded_folding_layer_is_skipped_by_lookup_but_reported_by_try_lookup() {
    let host = StenoDictionary::from_entries([("KAT", "cat"), ("-Z", "{^s}")]).unwrap();
    let fallback = FoldingDictionary::english(Options::default()).unwrap();
    let translator =
        Translator::new().with(FoldingDictionary::new(Options::default())).with(host).with(fallback);

    let mut context = LookupContext::new();
    assert_eq!(translator.try_lookup(&outline("KAT"), &mut context), Err(FoldError::NotLoaded));
    assert_eq!(translator.lookup(&outline("KAT"), &mut context).as_deref(), Some("cat"));
    assert_eq!(translator.lookup(&outline("KATZ"), &mut context).as_deref(), Some("cat {^s}"));
}

#[test]
fn memo_is_reused_within_a_stroke_and_cleared_after() {
    let translator = translator(&[("KAT", "cat")]);
    let mut context = LookupContext::new();

    assert_eq!(translator.lookup(&outline("KATZ"), &mut context), None);
    let first = *context.stats();
    assert_eq!(translator.lookup(&outline("KATZ"), &mut context), None);
    let second = context.stats().since(&first);
    assert!(second.memo_hits > 0);
    assert_eq!(second.candidates, 0);

    context.on_stroke();
    let before = *context.stats();
    assert_eq!(translator.lookup(&outline("KATZ"), &mut context), None);
    assert!(context.stats().since(&before).candidates > 0);
}

#[test]
fn folding_dictionaries_can_stack() {
    // The plural fold finds its base through the lower layer's star rule.
    let star = when(first_chord().toggles("*")).then([suffix_translation("!")]).unwrap();
    let host = StenoDictionary::from_entries([("KAT", "cat"), ("-Z", "{^s}")]).unwrap();
    let translator = Translator::new()
        .with(host)
        .with(FoldingDictionary::english(Options::default()).unwrap())
        .with(FoldingDictionary::with_rules(Options::default(), [star]));

    assert_eq!(translate(&translator, "KA*TZ").as_deref(), Some("cat! {^s}"));
}

#[test]
fn sibling_rules_cannot_both_claim_the_same_key() {
    let plain = when(last_chord().toggles("*")).then([use_defolded_translation()]).unwrap();
    let bang = when(last_chord().toggles("*")).then([suffix_translation("!")]).unwrap();
    let host = StenoDictionary::from_entries([("KAT", "cat")]).unwrap();
    let translator =
        Translator::new().with(FoldingDictionary::with_rules(Options::default(), [plain, bang])).with(host);

    // Each rule's nested lookup of KA*T reaches the other, which would toggle the star back.
    let mut context = LookupContext::new();
    assert_eq!(translator.lookup(&outline("KAT"), &mut context).as_deref(), Some("cat"));
    assert!(context.stats().overlaps_skipped >= 2);
    assert!(context.claims().is_empty());
}

#[test]
fn claims_follow_chords_across_an_emptied_chord() {
    let options = Options { check_shorter_outlines: false, ..Options::default() };
    let host = StenoDictionary::from_entries([("KAT", "cat")]).unwrap();

    // The star claimed on chord 1 stays claimed once chord 0 is folded away.
    let both = when(all([first_chord().folds("S"), last_chord().toggles("*")]))
        .then([use_defolded_translation()])
        .unwrap();
    let star = when(first_chord().toggles("*")).then([suffix_translation("!")]).unwrap();
    let translator = Translator::new().with(host.clone()).with(FoldingDictionary::with_rules(options, [both, star]));

    let mut context = LookupContext::new();
    assert_eq!(translator.lookup(&outline("S/KAT"), &mut context), None);
    assert!(context.stats().overlaps_skipped > 0);

    // The S claimed on chord 0 does not block the S of chord 1.
    let initial = when(first_chord().folds("S")).then([use_defolded_translation()]).unwrap();
    let translator = Translator::new().with(host).with(FoldingDictionary::with_rules(Options::default(), [initial]));

    let mut context = LookupContext::new();
    assert_eq!(translator.lookup(&outline("S/SKAT"), &mut context).as_deref(), Some("cat"));
    assert_eq!(context.stats().overlaps_skipped, 0);
}

#[test]
fn english_rule_names_are_stable() {
    let names: Vec<String> = english::rules().unwrap().iter().map(|rule| rule.name().to_string()).collect();
    assert_eq!(names, vec!["progressive", "past", "plural", "capitalised"]);
}

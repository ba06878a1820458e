use job_autofill::canonical::CanonicalFieldType;
use job_autofill::matching::{Matcher, Scorer, ScoringWeights};

use crate::common::fixtures::{CLASSIC_FORM, by_id, candidate_for, load, scan};

mod common;

#[test]
fn classic_form_assignment() {
    let page = load(CLASSIC_FORM);
    let candidates = scan(&page);
    let matches = Matcher::default().match_fields(&candidates);

    assert_eq!(matches.get(CanonicalFieldType::FirstName).map(|c| c.element), Some(by_id(&page, "first")));
    assert_eq!(matches.get(CanonicalFieldType::LastName).map(|c| c.element), Some(by_id(&page, "last")));
    assert_eq!(matches.get(CanonicalFieldType::Email).map(|c| c.element), Some(by_id(&page, "email")));
    assert_eq!(matches.get(CanonicalFieldType::City).map(|c| c.element), Some(by_id(&page, "city")));
    assert!(
        matches.get(CanonicalFieldType::FullName).is_none(),
        "first/last inputs are claimed before full name is considered"
    );
    assert_eq!(matches.len(), 4);
}

#[test]
fn first_name_score_combines_attribute_and_label() {
    let page = load(CLASSIC_FORM);
    let candidates = scan(&page);
    let first = candidate_for(&candidates, by_id(&page, "first"));

    let breakdown = Scorer::default().evaluate(first, CanonicalFieldType::FirstName);
    assert_eq!(breakdown.total, 90);
    let signals: Vec<&str> = breakdown.contributions.iter().map(|c| c.signal).collect();
    assert_eq!(signals, vec!["attribute_exact", "label"]);
}

#[test]
fn single_name_field_is_full_name() {
    let page = load(
        r#"<html><body>
            <label for="name">Full Name</label><input id="name" name="name">
            <label for="mail">Email address</label><input id="mail" name="mail" type="email">
        </body></html>"#,
    );
    let candidates = scan(&page);
    let matches = Matcher::default().match_fields(&candidates);

    let full_name = matches
        .assignments()
        .iter()
        .find(|a| a.field_type == CanonicalFieldType::FullName)
        .expect("full name matched");
    assert_eq!(full_name.candidate.element, by_id(&page, "name"));
    assert_eq!(full_name.score, 90);
    assert!(matches.get(CanonicalFieldType::FirstName).is_none());
}

#[test]
fn each_candidate_claims_at_most_one_type() {
    let page = load(
        r#"<html><body>
            <input name="email" type="email" aria-label="Email or phone">
            <input name="website" type="url" placeholder="Website or LinkedIn">
        </body></html>"#,
    );
    let candidates = scan(&page);
    let matches = Matcher::default().match_fields(&candidates);

    let mut elements: Vec<_> = matches.assignments().iter().map(|a| a.candidate.element).collect();
    let total = elements.len();
    elements.sort();
    elements.dedup();
    assert_eq!(elements.len(), total, "no candidate assigned twice");
    assert!(matches.assignments().iter().all(|a| a.score >= Matcher::default().threshold()));
}

#[test]
fn equal_scores_go_to_the_first_discovered_candidate() {
    for (first, second) in [("f1", "f2"), ("f2", "f1")] {
        let html = format!(
            r#"<html><body>
                <input id="{first}" name="email" type="email" aria-label="Email">
                <input id="{second}" name="email" type="email" aria-label="Email">
            </body></html>"#
        );
        let page = load(&html);
        let candidates = scan(&page);
        let scorer = Scorer::default();
        assert_eq!(
            scorer.score(&candidates[0], CanonicalFieldType::Email),
            scorer.score(&candidates[1], CanonicalFieldType::Email),
            "both inputs look identical"
        );

        let matches = Matcher::default().match_fields(&candidates);
        assert_eq!(
            matches.get(CanonicalFieldType::Email).map(|c| c.element),
            Some(by_id(&page, first)),
            "document order breaks the tie"
        );
    }
}

#[test]
fn matching_is_deterministic() {
    let page = load(CLASSIC_FORM);
    let candidates = scan(&page);
    let matcher = Matcher::default();

    let first: Vec<_> = matcher
        .match_fields(&candidates)
        .assignments()
        .iter()
        .map(|a| (a.field_type, a.candidate.element, a.score))
        .collect();
    for _ in 0..5 {
        let again: Vec<_> = matcher
            .match_fields(&candidates)
            .assignments()
            .iter()
            .map(|a| (a.field_type, a.candidate.element, a.score))
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn weak_context_alone_stays_below_threshold() {
    let page = load(
        r#"<html><body>
            <div>Tell us your city <input id="c"></div>
        </body></html>"#,
    );
    let candidates = scan(&page);
    let candidate = candidate_for(&candidates, by_id(&page, "c"));

    assert_eq!(Scorer::default().score(candidate, CanonicalFieldType::City), 10);
    assert!(Matcher::default().match_fields(&candidates).is_empty());
}

#[test]
fn tel_input_is_never_email() {
    let page = load(
        r#"<html><body>
            <label for="contact">Email</label><input id="contact" type="tel">
        </body></html>"#,
    );
    let candidates = scan(&page);
    let candidate = candidate_for(&candidates, by_id(&page, "contact"));

    let breakdown = Scorer::default().evaluate(candidate, CanonicalFieldType::Email);
    assert!(breakdown.contributions.iter().any(|c| c.signal == "tel_for_email"));
    assert!(breakdown.total < 0);

    let matches = Matcher::default().match_fields(&candidates);
    assert!(matches.get(CanonicalFieldType::Email).is_none());
}

#[test]
fn resume_prefers_file_inputs() {
    let page = load(
        r#"<html><body>
            <label for="resume-text">Resume</label><textarea id="resume-text"></textarea>
            <label for="resume-file">Resume/CV</label><input id="resume-file" type="file">
        </body></html>"#,
    );
    let candidates = scan(&page);
    let matches = Matcher::default().match_fields(&candidates);

    assert_eq!(
        matches.get(CanonicalFieldType::Resume).map(|c| c.element),
        Some(by_id(&page, "resume-file"))
    );
}

#[test]
fn custom_threshold_and_weights_change_outcome() {
    let page = load(
        r#"<html><body>
            <div>Tell us your city <input id="c"></div>
        </body></html>"#,
    );
    let candidates = scan(&page);

    let weights = ScoringWeights {
        surrounding_text: 45,
        ..ScoringWeights::default()
    };
    let matcher = Matcher::new(Scorer::new(weights), 40);
    let matches = matcher.match_fields(&candidates);
    assert_eq!(matches.get(CanonicalFieldType::City).map(|c| c.element), Some(by_id(&page, "c")));
}

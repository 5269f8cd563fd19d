// Integration tests for page-state classification
//
// The classifier must be a pure function of (URL, active-step label):
// URL-only for the four unambiguous shapes, one DOM read for the
// trailing-slash registration page.


use snapup::{Classifier, LogicalState, site};
use stub::StubPage;

const STAGE_URL: &str = "https://kktix.com/events/2024concert/registrations/abc-123/";

#[tokio::test]
async fn classifies_url_only_states_without_dom_reads() {
    // A page with no scripted DOM at all: any inner_text would fail,
    // so passing proves the classifier never touched the DOM.
    let page = StubPage::new("unused");
    let classifier = Classifier::new();

    let cases = [
        (
            "https://kklivetw.kktix.cc/events/2024concert",
            LogicalState::EntryPending,
        ),
        (
            "https://kktix.com/events/2024concert/registrations/new",
            LogicalState::TicketSelection,
        ),
        (
            "https://kktix.com/events/2024concert/registrations/abc-123/booking",
            LogicalState::Booking,
        ),
    ];
    for (url, expected) in cases {
        let state = classifier.classify(url, &page).await.expect("classify");
        assert_eq!(state, expected, "url: {url}");
    }
}

#[tokio::test]
async fn registration_url_resolves_through_step_label() {
    let page = StubPage::new(STAGE_URL);
    let classifier = Classifier::new();

    page.set_text(site::ACTIVE_STAGE, "1. 填寫表單");
    assert_eq!(
        classifier.classify(STAGE_URL, &page).await.expect("classify"),
        LogicalState::FormFill
    );

    page.set_text(site::ACTIVE_STAGE, "2. 取票繳費");
    assert_eq!(
        classifier.classify(STAGE_URL, &page).await.expect("classify"),
        LogicalState::Payment
    );

    page.set_text(site::ACTIVE_STAGE, "spinner");
    assert_eq!(
        classifier.classify(STAGE_URL, &page).await.expect("classify"),
        LogicalState::UnknownStage
    );
}

#[tokio::test]
async fn missing_step_indicator_is_unknown_stage_not_an_error() {
    // SPA render gap: URL already flipped, indicator not mounted yet.
    let page = StubPage::new(STAGE_URL);
    let state = Classifier::new()
        .classify(STAGE_URL, &page)
        .await
        .expect("classify");
    assert_eq!(state, LogicalState::UnknownStage);
}

#[tokio::test]
async fn out_of_pattern_urls_are_unknown() {
    let page = StubPage::new("unused");
    let classifier = Classifier::new();
    for url in [
        "https://kktix.com/",
        "https://kktix.com/events/2024concert/registrations/abc-123",
        "https://example.com/checkout",
        "about:blank",
    ] {
        assert_eq!(
            classifier.classify(url, &page).await.expect("classify"),
            LogicalState::UnknownUrl,
            "url: {url}"
        );
    }
}

#[tokio::test]
async fn classification_is_repeatable() {
    let page = StubPage::new(STAGE_URL);
    page.set_text(site::ACTIVE_STAGE, "1. 填寫表單");
    let classifier = Classifier::new();
    for _ in 0..3 {
        assert_eq!(
            classifier.classify(STAGE_URL, &page).await.expect("classify"),
            LogicalState::FormFill
        );
    }
}

// State classifier - URL pattern table plus one DOM fallback
//
// The site's single-page router changes the URL before the DOM content
// stabilizes, so classification leans on the URL first and reads the
// DOM only for the one genuinely overloaded URL shape (the trailing
// slash registration page, which hosts both the form and the payment
// step). That keeps classification to O(1) DOM reads per iteration.

use std::time::Duration;

use regex::Regex;

use crate::error::Result;
use crate::probe::Probe;
use crate::site;

/// Logical checkout-flow stage inferred from the page.
///
/// A closed tag set, recomputed every driver iteration and never
/// persisted. `Done` is only ever produced by the driver after the
/// payment handler finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalState {
    /// On the event landing page, registration not yet entered.
    EntryPending,
    /// On the ticket type/quantity selection page.
    TicketSelection,
    /// On the seat booking page (auto-assign sites skip through it).
    Booking,
    /// On the registration page, contact form step active.
    FormFill,
    /// On the registration page, pickup/payment step active.
    Payment,
    /// Registration URL, but the step indicator matched no known stage.
    /// Non-fatal: the driver waits and reclassifies.
    UnknownStage,
    /// URL outside every known pattern. Fatal.
    UnknownUrl,
    /// Terminal success state.
    Done,
}

/// Coarse URL-only classification, before any DOM read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlClass {
    Landing,
    TicketSelection,
    Booking,
    /// `.../registrations/{id}/` - ambiguous between form and payment;
    /// needs the active-step label to resolve.
    RegistrationStage,
    Unknown,
}

/// Classifies the live page into a [`LogicalState`].
///
/// Pure with respect to its inputs: the same (URL, step label) pair
/// always produces the same state.
pub struct Classifier {
    table: Vec<(Regex, UrlClass)>,
    stage_read_timeout: Duration,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        // Ordered, first match wins. Patterns are fixed at compile
        // time, so construction cannot fail at runtime.
        let table = vec![
            (
                Regex::new(&regex::escape(site::URL_LANDING_MARKER)).unwrap(),
                UrlClass::Landing,
            ),
            (
                Regex::new(site::URL_TICKET_SELECTION).unwrap(),
                UrlClass::TicketSelection,
            ),
            (Regex::new(site::URL_BOOKING).unwrap(), UrlClass::Booking),
            (
                Regex::new(site::URL_REGISTRATION_STAGE).unwrap(),
                UrlClass::RegistrationStage,
            ),
        ];
        Self {
            table,
            stage_read_timeout: Duration::from_millis(2_000),
        }
    }

    /// Classifies the page the URL belongs to, issuing at most one DOM
    /// read (the active-step label, and only for the one ambiguous URL
    /// shape).
    pub async fn classify(&self, url: &str, page: &dyn Probe) -> Result<LogicalState> {
        match self.classify_url(url) {
            UrlClass::Landing => Ok(LogicalState::EntryPending),
            UrlClass::TicketSelection => Ok(LogicalState::TicketSelection),
            UrlClass::Booking => Ok(LogicalState::Booking),
            UrlClass::RegistrationStage => {
                if page
                    .wait_for_attached(site::ACTIVE_STAGE, self.stage_read_timeout)
                    .await
                    .is_err()
                {
                    // Step indicator not mounted yet; let the page settle.
                    return Ok(LogicalState::UnknownStage);
                }
                let label = page.inner_text(site::ACTIVE_STAGE).await?;
                Ok(resolve_stage(&label))
            }
            UrlClass::Unknown => Ok(LogicalState::UnknownUrl),
        }
    }

    fn classify_url(&self, url: &str) -> UrlClass {
        for (pattern, class) in &self.table {
            if pattern.is_match(url) {
                return *class;
            }
        }
        UrlClass::Unknown
    }
}

/// Resolves the ambiguous registration URL from the active-step label.
pub fn resolve_stage(label: &str) -> LogicalState {
    if label.contains(site::STAGE_FORM_MARKER) {
        LogicalState::FormFill
    } else if label.contains(site::STAGE_PAYMENT_MARKER) {
        LogicalState::Payment
    } else {
        LogicalState::UnknownStage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_url(url: &str) -> UrlClass {
        Classifier::new().classify_url(url)
    }

    #[test]
    fn url_table_first_match_wins() {
        assert_eq!(
            classify_url("https://kklivetw.kktix.cc/events/2024concert"),
            UrlClass::Landing
        );
        assert_eq!(
            classify_url("https://kktix.com/events/2024concert/registrations/new"),
            UrlClass::TicketSelection
        );
        assert_eq!(
            classify_url("https://kktix.com/events/2024concert/registrations/abc-123/booking"),
            UrlClass::Booking
        );
        assert_eq!(
            classify_url("https://kktix.com/events/2024concert/registrations/abc-123/"),
            UrlClass::RegistrationStage
        );
    }

    #[test]
    fn registration_stage_requires_trailing_slash() {
        assert_eq!(
            classify_url("https://kktix.com/events/2024concert/registrations/abc-123"),
            UrlClass::Unknown
        );
    }

    #[test]
    fn unrelated_urls_are_unknown() {
        assert_eq!(classify_url("https://kktix.com/"), UrlClass::Unknown);
        assert_eq!(classify_url("https://example.com/events/"), UrlClass::Unknown);
        assert_eq!(classify_url("about:blank"), UrlClass::Unknown);
    }

    #[test]
    fn stage_label_resolution() {
        assert_eq!(resolve_stage("1. 填寫表單"), LogicalState::FormFill);
        assert_eq!(resolve_stage("2. 取票繳費"), LogicalState::Payment);
        assert_eq!(resolve_stage("loading..."), LogicalState::UnknownStage);
        assert_eq!(resolve_stage(""), LogicalState::UnknownStage);
    }

    #[test]
    fn classification_is_deterministic() {
        let url = "https://kktix.com/events/x/registrations/new";
        for _ in 0..3 {
            assert_eq!(classify_url(url), UrlClass::TicketSelection);
        }
    }
}

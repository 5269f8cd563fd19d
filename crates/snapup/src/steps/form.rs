// Form-fill step - contact information page
//
// Reads the confirmation countdown and cart summary for the audit log,
// reconciles the contact fields against the user profile, ticks the
// inline consent checkboxes, and submits the form. Reconciliation is
// idempotent: a field is only overwritten when its current value
// differs from the profile, so re-running the pass issues no writes.

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;
use crate::session::Session;
use crate::site;
use crate::steps::{ATTACH_TIMEOUT, StepHandler, StepOutcome, optional_text};

pub struct FormFillStep;

/// Extracts the HH:MM remainder from the countdown banner text.
pub(crate) fn parse_countdown_clock(text: &str) -> Option<String> {
    Regex::new(site::COUNTDOWN_CLOCK)
        .ok()?
        .find(text)
        .map(|m| m.as_str().to_string())
}

#[async_trait]
impl StepHandler for FormFillStep {
    fn name(&self) -> &'static str {
        "form-fill"
    }

    async fn run(&self, cx: &mut Session) -> Result<StepOutcome> {
        let run_id = cx.run_id();

        let countdown = cx.locator(site::COUNTDOWN_BLOCK);
        countdown.wait_for_attached(ATTACH_TIMEOUT).await?;
        let banner = countdown.inner_text().await?;
        if let Some(clock) = parse_countdown_clock(&banner) {
            tracing::info!(run_id, countdown = %clock, "time left to confirm the form");
            cx.order.form_countdown = Some(clock);
        }

        // Cart summary is audit-only; no control decision depends on it.
        let cart_table = cx.locator(site::CART_TICKET_TABLE);
        cart_table.wait_for_attached(ATTACH_TIMEOUT).await?;
        let ticket_type = optional_text(&cart_table.locator(site::TICKET_NAME)).await?;
        let seat = optional_text(&cart_table.locator(site::CART_SEAT_INFO)).await?;
        let count = optional_text(&cart_table.locator(site::CART_PRICE_COUNT)).await?;
        let subtotal = optional_text(&cart_table.locator(site::CART_PRICE_TOTAL)).await?;
        tracing::info!(run_id, ?ticket_type, ?seat, ?count, ?subtotal, "cart summary");
        if let Some(cart) = cx.order.cart.as_mut() {
            cart.subtotal = subtotal;
        }

        let contact = cx.locator(site::CONTACT_INFO);
        contact.wait_for_attached(ATTACH_TIMEOUT).await?;
        for group in contact.locator(site::CONTACT_GROUP).all().await? {
            let label = group.locator(site::CONTACT_LABEL).inner_text().await?;
            let textbox = group.locator(site::CONTACT_TEXTBOX);
            let current = textbox.input_value().await?;

            let desired = if label.contains(site::LABEL_NAME) {
                &cx.profile.name
            } else if label.contains(site::LABEL_EMAIL) {
                &cx.profile.email
            } else if label.contains(site::LABEL_PHONE) {
                &cx.profile.phone
            } else {
                tracing::warn!(run_id, %label, %current, "unrecognized contact field");
                continue;
            };

            tracing::info!(run_id, %label, %current, "contact field");
            if current != *desired {
                tracing::info!(run_id, %label, value = %desired, "filling contact field");
                textbox.fill(desired).await?;
            }
        }

        for checkbox in cx.locator(site::INLINE_CHECKBOX).all().await? {
            let text = checkbox.inner_text().await.unwrap_or_default();
            tracing::info!(run_id, checkbox = %text, "clicking inline checkbox");
            checkbox.click().await?;
        }

        let confirm = cx.locator(site::CONFIRM_FORM_TEXT);
        confirm.wait_for_attached(ATTACH_TIMEOUT).await?;
        tracing::info!(run_id, "clicking confirm-form");
        confirm.click().await?;
        Ok(StepOutcome::Advance)
    }
}

// Payment step - pickup and payment selection, final submit
//
// The last actionable stage. Captures the order number and payment
// deadline, logs the itemized cart, picks the configured pickup and
// payment methods, and clicks the final submit. A missing submit
// control is reported as [`Error::SubmitTimeout`]: the order may have
// gone through via redirect, so the run ends indeterminate rather than
// failed.
//
// [`Error::SubmitTimeout`]: crate::error::Error::SubmitTimeout

use async_trait::async_trait;
use regex::Regex;

use crate::error::{Error, Result};
use crate::session::Session;
use crate::site;
use crate::steps::{ATTACH_TIMEOUT, StepHandler, StepOutcome, optional_text};

pub struct PaymentStep;

/// Extracts the full date-time deadline from the countdown banner.
pub(crate) fn parse_payment_deadline(text: &str) -> Option<String> {
    Regex::new(site::COUNTDOWN_DEADLINE)
        .ok()?
        .find(text)
        .map(|m| m.as_str().to_string())
}

#[async_trait]
impl StepHandler for PaymentStep {
    fn name(&self) -> &'static str {
        "payment"
    }

    async fn run(&self, cx: &mut Session) -> Result<StepOutcome> {
        let run_id = cx.run_id();

        let countdown = cx.locator(site::COUNTDOWN_BLOCK);
        countdown.wait_for_attached(ATTACH_TIMEOUT).await?;
        let banner = countdown.inner_text().await?;
        if let Some(deadline) = parse_payment_deadline(&banner) {
            tracing::info!(run_id, %deadline, "payment deadline");
            cx.order.payment_deadline = Some(deadline);
        }

        if let Some(order_number) = optional_text(&cx.locator(site::ORDER_NUMBER_TITLE)).await? {
            tracing::info!(run_id, %order_number, "order number");
            cx.order.order_number = Some(order_number);
        } else {
            tracing::warn!(run_id, "order number block absent");
        }

        // Itemized cart, audit-only.
        let cart = cx.locator(site::CART_TICKET_LIST);
        for (field, selector) in [
            ("ticket_type", site::TICKET_NAME),
            ("ticket_seat", site::CART_SEAT_INFO),
            ("ticket_price", site::CART_PRICE_COUNT),
        ] {
            for cell in cart.locator(selector).all().await? {
                if let Some(text) = optional_text(&cell).await? {
                    tracing::debug!(run_id, field, value = %text.replace('\n', ", "), "cart line");
                }
            }
        }
        if let Some(total) = optional_text(&cx.locator(site::CART_TOTAL_AMOUNT)).await? {
            tracing::info!(run_id, %total, "total amount");
            cx.order.total_amount = Some(total);
        }

        let block = cx.locator(site::PICKUP_PAYMENT_BLOCK);

        // Pickup method: first radio whose label carries the marker.
        // Choosing one reveals an identifier textbox that wants the
        // buyer's national ID.
        let pickup = block.locator(site::PICKUP_BLOCK);
        for radio in pickup.locator(site::RADIO_GROUP).all().await? {
            let option = radio.locator(site::PICKUP_RADIO_LABEL).inner_text().await?;
            tracing::debug!(run_id, pickup_option = %option, "pickup option");
            if option.contains(&cx.criteria.pickup_method) {
                tracing::info!(run_id, pickup_option = %option, "selecting pickup method");
                radio.click().await?;
                let id_box = pickup.locator(site::PICKUP_ID_TEXTBOX);
                id_box.wait_for_attached(ATTACH_TIMEOUT).await?;
                tracing::info!(run_id, "typing national id");
                id_box
                    .type_text(&cx.profile.id_number, cx.typing_delay())
                    .await?;
                break;
            }
        }

        // Payment method: case-insensitive label match.
        let payment = block.locator(site::PAYMENT_BLOCK);
        let wanted = cx.criteria.payment_method.to_uppercase();
        for radio in payment.locator(site::RADIO_GROUP).all().await? {
            let option = radio.locator(site::PAYMENT_RADIO_LABEL).inner_text().await?;
            tracing::debug!(run_id, payment_option = %option, "payment option");
            if option.to_uppercase().contains(&wanted) {
                tracing::info!(run_id, payment_option = %option, "selecting payment method");
                radio.click().await?;
                break;
            }
        }

        let submit = cx.locator(site::FINAL_SUBMIT);
        match submit.wait_for_attached(ATTACH_TIMEOUT).await {
            Ok(()) => {
                tracing::info!(run_id, "clicking final submit");
                submit.click().await?;
                Ok(StepOutcome::Finished)
            }
            Err(Error::ElementNotFound(_)) => Err(Error::SubmitTimeout),
            Err(e) => Err(e),
        }
    }
}

// Ticket selection step
//
// Scans the ticket list in document order, selects the first row the
// purchase criteria accept, clicks the increment control the requested
// number of times, then advances unconditionally. Advancing even when
// nothing was selected is deliberate: the flow surfaces the failure at
// the form stage instead of looping on a page that will never match.

use async_trait::async_trait;

use crate::config::{CartLine, TargetCriteria};
use crate::error::Result;
use crate::session::Session;
use crate::site;
use crate::steps::{ATTACH_TIMEOUT, PROBE_TIMEOUT, StepHandler, StepOutcome, optional_text};

pub struct TicketSelectionStep;

impl TicketSelectionStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TicketSelectionStep {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a ticket row satisfies the purchase criteria.
///
/// The price is checked first: the displayed price with thousands
/// separators stripped has to contain the configured digits. Only when
/// the price does not match is the row name matched against the
/// seat-area alternation. The name is normalized the same way the
/// alternation was (whitespace stripped, uppercased), so "Rock A" in a
/// row matches a "rock a" criterion. First satisfying condition wins.
pub fn row_is_target(criteria: &TargetCriteria, name: &str, price: &str) -> bool {
    let stripped: String = price.chars().filter(|c| *c != ',').collect();
    if stripped.contains(&criteria.price) {
        return true;
    }
    let name_norm: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    criteria
        .seat_area
        .split('|')
        .filter(|alt| !alt.is_empty())
        .any(|alt| name_norm.contains(alt))
}

#[async_trait]
impl StepHandler for TicketSelectionStep {
    fn name(&self) -> &'static str {
        "ticket-selection"
    }

    async fn run(&self, cx: &mut Session) -> Result<StepOutcome> {
        let run_id = cx.run_id();
        cx.page().scroll_by(0, 800).await?;

        cx.locator(site::TICKET_LIST)
            .wait_for_attached(ATTACH_TIMEOUT)
            .await?;

        let rows = cx.locator(site::TICKET_ROW).all().await?;
        tracing::debug!(run_id, rows = rows.len(), "scanning ticket rows");

        let mut selection: Option<CartLine> = None;
        for row in &rows {
            let name = row
                .locator(site::TICKET_NAME)
                .inner_text()
                .await?
                .replace('\n', "");
            let price = row.locator(site::TICKET_PRICE).inner_text().await?;
            tracing::info!(run_id, ticket_name = %name, ticket_price = %price, "ticket row");

            // General-admission rows have no seat label; absence is data.
            let seat_locator = row.locator(site::TICKET_SEAT);
            let seat = if seat_locator.wait_for_attached(PROBE_TIMEOUT).await.is_ok() {
                optional_text(&seat_locator).await?
            } else {
                tracing::warn!(run_id, ticket_name = %name, "row has no seat label");
                None
            };

            if !row_is_target(&cx.criteria, &name, &price) {
                tracing::debug!(run_id, ticket_name = %name, "row does not match criteria");
                continue;
            }

            let quantity_text = row.locator(site::TICKET_QUANTITY).inner_text().await?;
            if quantity_text.contains(site::SOLD_OUT_MARKER) {
                tracing::info!(run_id, ticket_name = %name, "target row sold out, continuing scan");
                continue;
            }

            let plus = row.locator(site::TICKET_PLUS_BUTTON);
            for _ in 0..cx.criteria.quantity {
                tracing::info!(run_id, ticket_name = %name, "clicking quantity increment");
                plus.click().await?;
            }
            selection = Some(CartLine {
                ticket_type: Some(name),
                seat,
                count: Some(cx.criteria.quantity.to_string()),
                subtotal: None,
            });
            break;
        }

        match selection {
            Some(line) => {
                tracing::info!(run_id, cart = ?line, "ticket selected");
                cx.order.cart = Some(line);
            }
            // Fire step: advance anyway and let the form stage surface
            // the empty cart.
            None => tracing::warn!(run_id, "no ticket row matched; advancing regardless"),
        }

        cx.locator(site::AGREE_TERMS_CHECKBOX).click().await?;
        let next = cx.locator(site::NEXT_STEP_BUTTON);
        next.wait_for_attached(ATTACH_TIMEOUT).await?;
        tracing::info!(run_id, "clicking next-step button");
        next.click().await?;
        Ok(StepOutcome::Advance)
    }
}

// Step handlers - one action routine per logical checkout state
//
// Each handler performs a single bounded pass of probe calls for its
// state; retrying across passes is the driver's job. Handlers mutate
// only the session they are handed and never touch an automation
// engine directly.

pub mod booking;
pub mod entry;
pub mod form;
pub mod payment;
pub mod tickets;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::classify::LogicalState;
use crate::error::{Error, Result};
use crate::probe::Locator;
use crate::session::Session;

pub use booking::BookingStep;
pub use entry::EntryStep;
pub use form::FormFillStep;
pub use payment::PaymentStep;
pub use tickets::TicketSelectionStep;

/// How long a handler waits for an element its step cannot proceed
/// without.
pub(crate) const ATTACH_TIMEOUT: Duration = Duration::from_secs(10);

/// Short wait used to probe for elements that are legitimately absent
/// (seat labels on general-admission rows, the fans popup).
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// What the driver should do after a handler pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Reclassify and keep looping.
    Advance,
    /// The flow is complete; the driver exits with success.
    Finished,
}

/// Action routine bound to one logical state.
#[async_trait]
pub trait StepHandler: Send + Sync {
    /// Short name used in transition logs.
    fn name(&self) -> &'static str;

    /// Runs one pass of this step against the session's page.
    async fn run(&self, cx: &mut Session) -> Result<StepOutcome>;
}

/// Handler registry mapping each actionable state to its routine.
pub type HandlerRegistry = HashMap<LogicalState, Box<dyn StepHandler>>;

/// Builds the standard registry covering every actionable state.
/// `UnknownStage`, `UnknownUrl`, and `Done` are resolved by the driver
/// itself and carry no handler.
pub fn default_registry() -> HandlerRegistry {
    let mut handlers: HandlerRegistry = HashMap::new();
    handlers.insert(LogicalState::EntryPending, Box::new(EntryStep::new()));
    handlers.insert(
        LogicalState::TicketSelection,
        Box::new(TicketSelectionStep::new()),
    );
    handlers.insert(LogicalState::Booking, Box::new(BookingStep));
    handlers.insert(LogicalState::FormFill, Box::new(FormFillStep));
    handlers.insert(LogicalState::Payment, Box::new(PaymentStep));
    handlers
}

/// Reads an element's text, treating absence as empty.
///
/// Fields documented as optional on the page (seat labels, audit-only
/// cart cells) go through here so that a missing element is data, not
/// a failure.
pub(crate) async fn optional_text(locator: &Locator) -> Result<Option<String>> {
    match locator.inner_text().await {
        Ok(text) => Ok(Some(text)),
        Err(Error::ElementNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

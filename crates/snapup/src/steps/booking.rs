// Booking step - seat-map extension point
//
// Events configured for automatic seat allocation route straight
// through this page, so the standard handler is a pass-through. Manual
// seat-map interaction is out of scope; sites that need it can replace
// this entry in the handler registry.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::Session;
use crate::steps::{StepHandler, StepOutcome};

pub struct BookingStep;

#[async_trait]
impl StepHandler for BookingStep {
    fn name(&self) -> &'static str {
        "booking"
    }

    async fn run(&self, cx: &mut Session) -> Result<StepOutcome> {
        tracing::debug!(run_id = cx.run_id(), "booking page: auto-assign seating, no action");
        Ok(StepOutcome::Advance)
    }
}

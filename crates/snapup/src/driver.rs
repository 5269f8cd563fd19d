// Driver - the orchestration loop
//
// Repeatedly classifies the page, dispatches to the handler registered
// for that state, and loops until a terminal condition: the payment
// handler finishing (success), an unknown URL (failure), the submit
// control going missing (indeterminate), or the wall-clock budget
// expiring (timeout). UnknownStage never terminates - it is "wait and
// reclassify", which rides out transient SPA rendering gaps.

use std::time::Duration;

use tokio::time::Instant;

use crate::classify::{Classifier, LogicalState};
use crate::error::{Error, Result};
use crate::login;
use crate::session::Session;
use crate::steps::{HandlerRegistry, StepOutcome, default_registry};

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The payment handler submitted the order.
    Completed,
    /// The final submit control never attached; the order may have
    /// completed via redirect.
    Indeterminate,
}

/// Orchestrates one checkout run over a session.
///
/// The driver composes a [`Classifier`], a handler registry, and the
/// session it is handed; it owns no page state of its own. One driver
/// can run many sessions, one at a time each.
pub struct Driver {
    classifier: Classifier,
    handlers: HandlerRegistry,
    poll_interval: Duration,
    flow_budget: Duration,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    /// Driver with the standard handler registry, a 100 ms poll
    /// interval, and a 45 minute flow budget.
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
            handlers: default_registry(),
            poll_interval: Duration::from_millis(100),
            flow_budget: Duration::from_secs(45 * 60),
        }
    }

    /// Replaces the handler registry (e.g. a real booking handler).
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Sets the global wall-clock budget for the whole flow.
    pub fn with_flow_budget(mut self, budget: Duration) -> Self {
        self.flow_budget = budget;
        self
    }

    /// Sets the inter-iteration delay (backpressure against hammering
    /// the DOM).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bootstrap: sign in, then navigate to the target event page.
    /// Runs once, before [`Driver::run`].
    pub async fn bootstrap(&self, cx: &Session) -> Result<()> {
        login::login(
            cx.page().as_ref(),
            &cx.profile,
            &cx.criteria.url,
            cx.typing_delay(),
        )
        .await?;
        cx.page().goto(&cx.criteria.url).await?;
        let title = cx.page().title().await?;
        tracing::info!(run_id = cx.run_id(), %title, "event page loaded");
        Ok(())
    }

    /// Runs the classify/dispatch loop to a terminal state.
    pub async fn run(&self, cx: &mut Session) -> Result<FlowOutcome> {
        let run_id = cx.run_id();
        let deadline = Instant::now() + self.flow_budget;
        let mut last_state = LogicalState::EntryPending;

        loop {
            tokio::time::sleep(self.poll_interval).await;
            if Instant::now() >= deadline {
                tracing::error!(run_id, ?last_state, "flow budget exhausted");
                return Err(Error::FlowTimeout {
                    last_state,
                    budget_secs: self.flow_budget.as_secs(),
                });
            }

            // Classification can race the SPA re-render (the step
            // indicator detaching between the wait and the read); such
            // misses are transient, so reclassify instead of aborting.
            let url = match cx.page().current_url().await {
                Ok(url) => url,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(run_id, error = %e, "url read failed, retrying");
                    continue;
                }
            };
            let state = match self.classifier.classify(&url, cx.page().as_ref()).await {
                Ok(state) => state,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(run_id, %url, error = %e, "classification failed, retrying");
                    continue;
                }
            };
            tracing::info!(run_id, ?state, %url, "classified page");
            last_state = state;

            match state {
                LogicalState::UnknownUrl => {
                    tracing::error!(run_id, %url, "url outside every known stage");
                    return Err(Error::UnknownUrl { url });
                }
                LogicalState::UnknownStage => {
                    // Transient SPA render gap; wait for it to settle.
                    tracing::info!(run_id, "stage indicator unresolved, waiting");
                    continue;
                }
                LogicalState::Done => return Ok(FlowOutcome::Completed),
                actionable => {
                    let Some(handler) = self.handlers.get(&actionable) else {
                        tracing::warn!(run_id, ?actionable, "no handler registered, waiting");
                        continue;
                    };
                    tracing::debug!(run_id, step = handler.name(), "dispatching");
                    match handler.run(cx).await {
                        Ok(StepOutcome::Advance) => {}
                        Ok(StepOutcome::Finished) => {
                            tracing::info!(run_id, order = ?cx.order, "flow complete");
                            return Ok(FlowOutcome::Completed);
                        }
                        Err(Error::SubmitTimeout) => {
                            tracing::warn!(
                                run_id,
                                "submit control never attached; order state indeterminate"
                            );
                            return Ok(FlowOutcome::Indeterminate);
                        }
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            // Pass aborted; the page may still be
                            // settling. Reclassify next iteration.
                            tracing::warn!(run_id, step = handler.name(), error = %e, "step pass failed");
                        }
                    }
                }
            }
        }
    }
}

// Entry step - event landing page
//
// Navigates to the target event page if the router bounced us back,
// scrolls to force lazy content to mount, and clicks through to the
// registration flow. A client-side fans-question popup may appear on
// the way; answering it is best-effort (it is an anti-bot gate outside
// this engine's control).

use async_trait::async_trait;

use crate::error::Result;
use crate::session::Session;
use crate::site;
use crate::steps::{ATTACH_TIMEOUT, PROBE_TIMEOUT, StepHandler, StepOutcome};

/// Scroll gestures issued to mount lazy content, and pixels per gesture.
const SCROLL_GESTURES: u32 = 10;
const SCROLL_STEP_PX: i64 = 800;

pub struct EntryStep {
    /// Answer submitted to the fans question when the popup appears.
    /// Defaults to empty; the gate's questions are not predictable
    /// enough to answer mechanically.
    fans_answer: String,
}

impl EntryStep {
    pub fn new() -> Self {
        Self {
            fans_answer: String::new(),
        }
    }

    pub fn with_fans_answer(answer: impl Into<String>) -> Self {
        Self {
            fans_answer: answer.into(),
        }
    }

    /// Detects the fans-question popup and submits the configured
    /// answer. Absence of the popup is the normal case.
    async fn answer_fans_question(&self, cx: &Session) -> Result<()> {
        let root = cx.locator(site::FANS_POPUP_ROOT);
        if root.wait_for_attached(PROBE_TIMEOUT).await.is_err() {
            return Ok(());
        }
        let popup = cx.locator(site::FANS_POPUP);
        let question = popup.locator(site::FANS_QUESTION).inner_text().await?;
        tracing::info!(run_id = cx.run_id(), %question, "fans question popup detected");
        popup
            .locator(site::FANS_ANSWER_BOX)
            .fill(&self.fans_answer)
            .await?;
        Ok(())
    }
}

impl Default for EntryStep {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepHandler for EntryStep {
    fn name(&self) -> &'static str {
        "entry"
    }

    async fn run(&self, cx: &mut Session) -> Result<StepOutcome> {
        let page = cx.page();
        let current = page.current_url().await?;
        if current != cx.criteria.url {
            tracing::info!(run_id = cx.run_id(), url = %cx.criteria.url, "navigating to event page");
            page.goto(&cx.criteria.url).await?;
        }

        for _ in 0..SCROLL_GESTURES {
            tracing::debug!(run_id = cx.run_id(), "wheel down {SCROLL_STEP_PX}");
            page.scroll_by(0, SCROLL_STEP_PX).await?;
        }

        let next = cx.locator(site::NEXT_STEP_LINK);
        next.wait_for_attached(ATTACH_TIMEOUT).await?;
        tracing::info!(run_id = cx.run_id(), "clicking next-step link");
        next.click().await?;

        self.answer_fans_question(cx).await?;
        Ok(StepOutcome::Advance)
    }
}

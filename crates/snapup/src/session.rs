// Session - per-run mutable context
//
// One session per run, exclusively owning its page handle. The session
// is mutated only by the driver and by the handler it is currently
// dispatching to; independent runs (multiple accounts) use independent
// sessions and share nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::{OrderSnapshot, TargetCriteria, UserProfile};
use crate::probe::{Locator, PageHandle};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Per-run aggregate of purchase intent, user profile, in-progress
/// order data, and the page handle.
pub struct Session {
    run_id: u64,
    pub criteria: TargetCriteria,
    pub profile: UserProfile,
    pub order: OrderSnapshot,
    typing_delay: Duration,
    page: PageHandle,
}

impl Session {
    pub fn new(
        page: PageHandle,
        criteria: TargetCriteria,
        profile: UserProfile,
        typing_delay: Duration,
    ) -> Self {
        Self {
            run_id: NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed),
            criteria,
            profile,
            order: OrderSnapshot::default(),
            typing_delay,
            page,
        }
    }

    /// Identifier tagged onto every log event for this run.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// The page this run exclusively owns.
    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    /// Root locator for a selector on this session's page.
    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(Arc::clone(&self.page), selector)
    }

    /// Per-character delay for simulated typing.
    pub fn typing_delay(&self) -> Duration {
        self.typing_delay
    }
}

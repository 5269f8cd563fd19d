//! Offline dry run of the checkout driver against a simulated site
//!
//! Run with: cargo run --example dry_run
//!
//! A tiny in-memory probe plays the part of the ticketing site so the
//! whole classify/dispatch loop can be watched without a browser. Wire
//! a real probe implementation over your automation engine of choice
//! to drive the actual site.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use snapup::{
    Driver, Error, PageHandle, Probe, Result, Session, TargetCriteria, UserProfile, site,
};

const LANDING_URL: &str = "https://kklivetw.kktix.cc/events/2024concert";
const NEW_URL: &str = "https://kktix.com/events/2024concert/registrations/new";
const BOOKING_URL: &str = "https://kktix.com/events/2024concert/registrations/demo-1/booking";
const STAGE_URL: &str = "https://kktix.com/events/2024concert/registrations/demo-1/";

/// Simulated site: one general ticket row, auto-assigned seating, a
/// two-step registration page.
struct DemoSite {
    url: Mutex<String>,
    stage: Mutex<&'static str>,
}

impl DemoSite {
    fn new() -> Self {
        Self {
            url: Mutex::new(LANDING_URL.to_string()),
            stage: Mutex::new("1. 填寫表單"),
        }
    }
}

#[async_trait]
impl Probe for DemoSite {
    async fn goto(&self, url: &str) -> Result<()> {
        *self.url.lock() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let mut url = self.url.lock();
        let current = url.clone();
        // The booking page auto-assigns seats and moves straight on.
        if current == BOOKING_URL {
            *url = STAGE_URL.to_string();
        }
        Ok(current)
    }

    async fn title(&self) -> Result<String> {
        Ok("2024 Concert | Demo".to_string())
    }

    async fn wait_for_attached(&self, selector: &str, _timeout: Duration) -> Result<()> {
        if selector == site::FANS_POPUP_ROOT {
            return Err(Error::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    async fn inner_text(&self, selector: &str) -> Result<String> {
        let text = if selector.ends_with(site::TICKET_NAME) {
            "特B區"
        } else if selector.ends_with(site::TICKET_PRICE) {
            "2,800"
        } else if selector.ends_with(site::TICKET_SEAT) {
            "3F 特B"
        } else if selector.ends_with(site::TICKET_QUANTITY) {
            "剩餘 10"
        } else if selector == site::ACTIVE_STAGE {
            return Ok((*self.stage.lock()).to_string());
        } else if selector == site::COUNTDOWN_BLOCK {
            if *self.stage.lock() == "1. 填寫表單" {
                "請於 29:59 內確認"
            } else {
                "請於 2024/06/20 23:59 前完成繳費"
            }
        } else if selector == site::ORDER_NUMBER_TITLE {
            "訂單 #DEMO-001"
        } else if selector.ends_with(site::PICKUP_RADIO_LABEL) {
            "全家取票"
        } else if selector.ends_with(site::PAYMENT_RADIO_LABEL) {
            "ATM 轉帳"
        } else {
            ""
        };
        Ok(text.to_string())
    }

    async fn input_value(&self, _selector: &str) -> Result<String> {
        Ok(String::new())
    }

    async fn get_attribute(&self, _selector: &str, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if selector == site::NEXT_STEP_LINK {
            *self.url.lock() = NEW_URL.to_string();
        } else if selector == site::NEXT_STEP_BUTTON {
            *self.url.lock() = BOOKING_URL.to_string();
        } else if selector == site::CONFIRM_FORM_TEXT {
            *self.stage.lock() = "2. 取票繳費";
        }
        Ok(())
    }

    async fn type_text(&self, _selector: &str, _text: &str, _delay: Duration) -> Result<()> {
        Ok(())
    }

    async fn fill(&self, _selector: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        if selector == site::TICKET_ROW || selector.ends_with(site::RADIO_GROUP) {
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn scroll_by(&self, _dx: i64, _dy: i64) -> Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapup=debug".parse().unwrap()),
        )
        .init();

    let criteria = TargetCriteria::new(LANDING_URL, "特B", "2800", 2, "全家", "ATM")?;
    let profile = UserProfile {
        account: "demo@example.com".into(),
        password: "demo-password".into(),
        name: "王小明".into(),
        email: "demo@example.com".into(),
        phone: "0912345678".into(),
        id_number: "A123456789".into(),
    };

    let page: PageHandle = Arc::new(DemoSite::new());
    let mut session = Session::new(page, criteria, profile, Duration::from_millis(1));

    let driver = Driver::new().with_poll_interval(Duration::from_millis(50));
    let outcome = driver.run(&mut session).await?;

    println!("outcome: {outcome:?}");
    println!("order:   {:?}", session.order);
    Ok(())
}

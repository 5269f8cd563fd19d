//! snapup: checkout-flow automation engine for KKTIX ticket snap-up runs
//!
//! The engine infers which step of a multi-page checkout flow is
//! displayed - from the URL and, for one ambiguous page, a single DOM
//! read - dispatches the matching step handler, and loops until the
//! order is submitted, the flow lands somewhere unrecognizable, or the
//! wall-clock budget runs out.
//!
//! Browser lifecycle stays outside the crate: the host launches
//! whatever engine it likes and hands the engine a [`probe::Probe`]
//! implementation for the page. Every handler is written purely
//! against that contract.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use snapup::{Driver, Session, SessionOptions, TargetCriteria, UserProfile};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = SessionOptions::default();
//!     let criteria = TargetCriteria::new(
//!         "https://kklivetw.kktix.cc/events/2024concert",
//!         "特B",
//!         "2800",
//!         2,
//!         "全家",
//!         "ATM",
//!     )?;
//!     let profile = UserProfile {
//!         account: "user@example.com".into(),
//!         password: "secret".into(),
//!         name: "王小明".into(),
//!         email: "user@example.com".into(),
//!         phone: "0912345678".into(),
//!         id_number: "A123456789".into(),
//!     };
//!
//!     // `page` is whatever the host's browser bootstrap produced.
//!     let page: snapup::PageHandle = my_browser_bootstrap(&options).await?;
//!     let mut session = Session::new(
//!         page,
//!         criteria,
//!         profile,
//!         Duration::from_millis(options.typing_delay_ms),
//!     );
//!
//!     let driver = Driver::new();
//!     driver.bootstrap(&session).await?;
//!     let outcome = driver.run(&mut session).await?;
//!     println!("{outcome:?}: {:?}", session.order);
//!     Ok(())
//! }
//! ```

pub mod captcha;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod login;
pub mod probe;
pub mod session;
pub mod site;
pub mod steps;

pub use captcha::{CaptchaSolver, NoSolver, RecaptchaChallenge};
pub use classify::{Classifier, LogicalState};
pub use config::{
    CartLine, Geolocation, OrderSnapshot, SessionOptions, TargetCriteria, UserProfile,
};
pub use driver::{Driver, FlowOutcome};
pub use error::{Error, Result};
pub use login::login;
pub use probe::{Locator, PageHandle, Probe};
pub use session::Session;
pub use steps::{HandlerRegistry, StepHandler, StepOutcome, default_registry};

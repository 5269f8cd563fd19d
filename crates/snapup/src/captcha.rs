// CAPTCHA solver contract
//
// The engine itself never solves a reCAPTCHA; hosts that hit one can
// wire a solver service into the entry or ticket-selection handlers.
// The fans-question popup handled by the entry step is a simpler
// client-side gate and does not go through this interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Challenge descriptor handed to an external solver service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecaptchaChallenge {
    /// Page URL the challenge appeared on.
    pub site_url: String,
    /// The site's public reCAPTCHA key.
    pub site_key: String,
    /// Optional proxy for solvers that route through one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// External service that turns a challenge into a solved token.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    async fn solve(&self, challenge: &RecaptchaChallenge) -> Result<String>;
}

/// Solver used when no service is configured; always reports the
/// capability as absent.
pub struct NoSolver;

#[async_trait]
impl CaptchaSolver for NoSolver {
    async fn solve(&self, challenge: &RecaptchaChallenge) -> Result<String> {
        Err(Error::Probe(format!(
            "no captcha solver configured for {}",
            challenge.site_url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_serializes_camel_case() {
        let challenge = RecaptchaChallenge {
            site_url: "https://kktix.com/events/x/registrations/new".into(),
            site_key: "6Lc_key".into(),
            proxy: None,
        };
        let json = serde_json::to_value(&challenge).unwrap();
        assert_eq!(json["siteKey"], "6Lc_key");
        assert!(json.get("proxy").is_none());
    }

    #[tokio::test]
    async fn no_solver_reports_absent() {
        let challenge = RecaptchaChallenge {
            site_url: "https://kktix.com/".into(),
            site_key: "k".into(),
            proxy: None,
        };
        assert!(NoSolver.solve(&challenge).await.is_err());
    }
}

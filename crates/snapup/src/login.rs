// Account sign-in, run once before the driver loop starts

use std::time::Duration;

use url::Url;

use crate::config::UserProfile;
use crate::error::{Error, Result};
use crate::probe::Probe;
use crate::site;

/// Signs in with the profile's account and password.
///
/// Navigates to the sign-in page with `back_to` pointing at the target
/// event, types the credentials with the configured per-character
/// delay, and submits. Must complete before the driver's bootstrap
/// navigation.
pub async fn login(
    page: &dyn Probe,
    profile: &UserProfile,
    back_to: &str,
    typing_delay: Duration,
) -> Result<()> {
    let mut url = Url::parse(site::LOGIN_URL)
        .map_err(|e| Error::Navigation(format!("bad login url: {e}")))?;
    url.query_pairs_mut().append_pair("back_to", back_to);

    page.goto(url.as_str()).await?;
    tracing::info!(account = %profile.account, "typing account");
    page.type_text(site::LOGIN_ACCOUNT_INPUT, &profile.account, typing_delay)
        .await?;
    tracing::info!("typing password");
    page.type_text(site::LOGIN_PASSWORD_INPUT, &profile.password, typing_delay)
        .await?;
    tracing::info!("clicking sign-in");
    page.click(site::LOGIN_SUBMIT).await?;
    Ok(())
}

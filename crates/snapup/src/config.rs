// Per-run configuration and order data
//
// TargetCriteria and UserProfile are immutable for the run and passed
// into the session at construction; there is no shared default state
// between runs. OrderSnapshot is the one mutable aggregate, owned by
// the session and filled in stage by stage.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Immutable purchase intent for one run.
///
/// A ticket row is a target when its price (thousands separators
/// stripped) contains `price`, or failing that when its name matches
/// the normalized `seat_area` alternation. Exactly one of the two has
/// to hold; rows matching neither are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCriteria {
    /// Event landing page the run navigates to.
    pub url: String,

    /// Desired ticket-type pattern, informational for logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_types: Option<String>,

    /// Seat-area alternation, normalized by [`TargetCriteria::new`]:
    /// whitespace stripped, commas turned into `|`, uppercased.
    pub seat_area: String,

    /// Price digits matched against the displayed price with thousands
    /// separators stripped.
    pub price: String,

    /// How many increment clicks to issue on the selected row.
    pub quantity: u32,

    /// Marker matched against pickup radio labels (e.g. a convenience
    /// store chain name).
    pub pickup_method: String,

    /// Marker matched case-insensitively against payment radio labels
    /// (e.g. "ATM").
    pub payment_method: String,
}

impl TargetCriteria {
    /// Builds criteria, normalizing the seat-area pattern and rejecting
    /// unusable values.
    pub fn new(
        url: impl Into<String>,
        seat_area: &str,
        price: impl Into<String>,
        quantity: u32,
        pickup_method: impl Into<String>,
        payment_method: impl Into<String>,
    ) -> Result<Self> {
        if quantity == 0 {
            return Err(Error::InvalidCriteria("quantity must be positive".into()));
        }
        let price = price.into();
        if price.is_empty() {
            return Err(Error::InvalidCriteria("price must not be empty".into()));
        }
        Ok(Self {
            url: url.into(),
            ticket_types: None,
            seat_area: normalize_seat_area(seat_area),
            price,
            quantity,
            pickup_method: pickup_method.into(),
            payment_method: payment_method.into(),
        })
    }
}

/// Normalizes a user-supplied seat-area pattern into the alternation
/// form the ticket scan matches against: spaces removed, commas become
/// `|`, uppercased.
pub fn normalize_seat_area(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '|' } else { c })
        .collect::<String>()
        .to_uppercase()
}

/// Account and contact data used for login and form reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub account: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// National ID typed into the pickup identifier box when the chosen
    /// pickup method requires one.
    pub id_number: String,
}

/// Geographic coordinates handed to the browser bootstrap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Options the host's browser bootstrap needs to produce a page handle.
///
/// The engine does not launch browsers itself; it hands these to the
/// external session bootstrap and consumes the resulting [`PageHandle`].
///
/// [`PageHandle`]: crate::probe::PageHandle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    /// Run the browser without a visible window (default: false; the
    /// real site is far less hostile to a headful browser).
    pub headless: bool,

    /// Navigation timeout in milliseconds (default: 90 000).
    pub navigation_timeout_ms: u64,

    /// Per-character delay for simulated typing, in milliseconds.
    pub typing_delay_ms: u64,

    /// Desktop Chrome user agent presented to the site.
    pub user_agent: String,

    /// Browser locale (default: zh-TW).
    pub locale: String,

    /// IANA time zone (default: Asia/Taipei).
    pub timezone_id: String,

    /// Coordinates reported when the site asks for geolocation.
    pub geolocation: Geolocation,

    /// Permissions granted up front so no permission prompt interrupts
    /// the flow.
    pub permissions: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: false,
            navigation_timeout_ms: 90_000,
            typing_delay_ms: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .into(),
            locale: "zh-TW".into(),
            timezone_id: "Asia/Taipei".into(),
            geolocation: Geolocation {
                latitude: 25.034_000,
                longitude: 121.564_555,
            },
            permissions: vec!["geolocation".into()],
        }
    }
}

/// One line of the cart summary, captured for audit logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub ticket_type: Option<String>,
    pub seat: Option<String>,
    pub count: Option<String>,
    pub subtotal: Option<String>,
}

/// Order data accumulated as the flow progresses.
///
/// Fields are filled lazily by the stage that first observes them and
/// never cleared until the run ends. Later stages tolerate earlier
/// fields being absent when a flow is entered mid-stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    /// Cart summary captured at the ticket/form stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartLine>,

    /// Order number captured from the payment page summary block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    /// Remaining time shown on the form page (HH:MM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_countdown: Option<String>,

    /// Payment deadline shown on the payment page (date-time).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_deadline: Option<String>,

    /// Grand total as displayed, separators intact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_area_normalization() {
        assert_eq!(normalize_seat_area("特B"), "特B");
        assert_eq!(normalize_seat_area(" 特a, 特b "), "特A|特B");
        assert_eq!(normalize_seat_area("rock a,rock b"), "ROCKA|ROCKB");
    }

    #[test]
    fn criteria_rejects_zero_quantity() {
        let err = TargetCriteria::new("https://kktix.com/", "特B", "2800", 0, "全家", "ATM")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCriteria(_)));
    }

    #[test]
    fn session_options_serialize_camel_case() {
        let json = serde_json::to_value(SessionOptions::default()).unwrap();
        assert_eq!(json["timezoneId"], "Asia/Taipei");
        assert_eq!(json["navigationTimeoutMs"], 90_000);
        assert_eq!(json["geolocation"]["latitude"], 25.034);
    }
}

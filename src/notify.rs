//! SMS risk alerts.
//!
//! Alerts are best effort. A misconfigured or failing provider is reported
//! back to the caller and never changes the assessment itself.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SmsSettings;
use crate::feasibility::FeasibilityStatus;
use crate::risk::RiskTier;

const PLACEHOLDER_SID: &str = "your_account_sid_here";
const PLACEHOLDER_TOKEN: &str = "your_auth_token_here";
const PLACEHOLDER_FROM: &str = "+1234567890";
const ACCOUNT_SID_LEN: usize = 34;

lazy_static! {
    static ref E164: Regex = Regex::new(r"^\+[1-9]\d{7,14}$").expect("valid E.164 pattern");
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SmsError {
    #[error("Missing TWILIO_ACCOUNT_SID or TWILIO_AUTH_TOKEN environment variables")]
    MissingCredentials,

    #[error("Twilio credentials are placeholder values. Update the .env file with valid credentials.")]
    PlaceholderCredentials,

    #[error("Invalid TWILIO_ACCOUNT_SID format. Should start with 'AC' and be 34 characters long.")]
    InvalidAccountSid,

    #[error("Missing TWILIO_FROM_NUMBER environment variable")]
    MissingSender,

    #[error("Recipient {0} is not an E.164 phone number")]
    InvalidRecipient(String),

    #[error("SMS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("SMS provider returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub fn is_e164(number: &str) -> bool {
    E164.is_match(number)
}

/// Short field instructions for each tier, as sent in the SMS body.
pub fn precautions(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Critical => {
            "Evacuate immediately; Close access; Notify authorities; Deploy monitoring."
        }
        RiskTier::High => {
            "Restrict access; Increase monitoring; Install warning signs; Prepare evacuation plan."
        }
        RiskTier::Moderate => {
            "Maintain monitoring; Set warnings; Inspect bi-weekly; Be vigilant after storms."
        }
        RiskTier::Low => {
            "Continue standard monitoring; Maintain safety protocols; Review plans quarterly."
        }
    }
}

pub fn precaution_message(tier: RiskTier, score: f64, status: FeasibilityStatus) -> String {
    format!(
        "Rockfall Risk: {tier} ({score:.0}%). Mining: {status}. Precautions: {}",
        precautions(tier)
    )
}

/// Twilio REST client.
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    endpoint: String,
}

impl SmsClient {
    /// Validate settings and build a client.
    pub fn from_settings(settings: &SmsSettings) -> Result<Self, SmsError> {
        let (Some(account_sid), Some(auth_token)) =
            (settings.account_sid.as_deref(), settings.auth_token.as_deref())
        else {
            return Err(SmsError::MissingCredentials);
        };

        if account_sid == PLACEHOLDER_SID || auth_token == PLACEHOLDER_TOKEN {
            return Err(SmsError::PlaceholderCredentials);
        }

        if !account_sid.starts_with("AC") || account_sid.len() != ACCOUNT_SID_LEN {
            return Err(SmsError::InvalidAccountSid);
        }

        let from_number = settings
            .from_number
            .as_deref()
            .filter(|n| *n != PLACEHOLDER_FROM)
            .ok_or(SmsError::MissingSender)?;

        Ok(Self {
            http: reqwest::Client::new(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from_number: from_number.to_string(),
            endpoint: format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                settings.api_base, account_sid
            ),
        })
    }

    pub fn from_number(&self) -> &str {
        &self.from_number
    }

    /// Send one message. No retry.
    pub async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        if !is_e164(to) {
            return Err(SmsError::InvalidRecipient(to.to_string()));
        }

        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %to, "SMS alert sent");
        Ok(())
    }
}

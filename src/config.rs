//! Runtime configuration from the environment.
//!
//! Nothing here is required. Missing SMS settings only switch alerts off.

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TWILIO_API: &str = "https://api.twilio.com";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmsSettings {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    /// Base URL of the messaging API; overridable for staging and tests.
    pub api_base: String,
    /// Recipient used when a request enables alerts without naming one.
    pub default_recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub sms: SmsSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sms: SmsSettings {
                api_base: DEFAULT_TWILIO_API.to_string(),
                ..SmsSettings::default()
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PORT, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            sms: SmsSettings {
                account_sid: get("TWILIO_ACCOUNT_SID"),
                auth_token: get("TWILIO_AUTH_TOKEN"),
                from_number: get("TWILIO_FROM_NUMBER"),
                api_base: get("TWILIO_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_TWILIO_API.to_string()),
                default_recipient: get("ALERT_TO_NUMBER"),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert!(config.sms.account_sid.is_none());
    }

    #[test]
    fn test_reads_sms_settings() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("TWILIO_ACCOUNT_SID", "AC0123456789abcdef0123456789abcdef"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_FROM_NUMBER", "+15550001111"),
            ("TWILIO_API_BASE", "http://127.0.0.1:9999/"),
            ("ALERT_TO_NUMBER", " +15552223333 "),
        ]));
        assert_eq!(config.port, 8081);
        assert_eq!(config.sms.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.sms.api_base, "http://127.0.0.1:9999");
        assert_eq!(config.sms.default_recipient.as_deref(), Some("+15552223333"));
    }

    #[test]
    fn test_bad_port_and_blank_values() {
        let config = Config::from_lookup(lookup(&[("PORT", "http"), ("TWILIO_AUTH_TOKEN", "   ")]));
        assert_eq!(config.port, 3000);
        assert!(config.sms.auth_token.is_none());
    }
}

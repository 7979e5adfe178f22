//! Dexcom Share API client
//!
//! Speaks the Share follower protocol: authenticate the publisher account to
//! obtain an account id, log in with it to obtain a session id, then read the
//! latest glucose value with that session. An expired session is dropped and
//! re-established once within the same fetch.

use crate::core::{AccountConfig, Error, GlucoseSample, Region, Result, TrendCode};
use crate::source::ReadingSource;
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const US_BASE_URL: &str = "https://share2.dexcom.com/ShareWebServices/Services";
const OUS_BASE_URL: &str = "https://shareous1.dexcom.com/ShareWebServices/Services";
const JP_BASE_URL: &str = "https://share.dexcom.jp/ShareWebServices/Services";

const APPLICATION_ID: &str = "d89443d2-327c-4a6f-89e5-496bbb0317db";
const JP_APPLICATION_ID: &str = "d8665ade-9673-4e27-9ff6-92db4ce13d13";

/// Session id returned for invalid credentials
const INVALID_SESSION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// How far back to look for a reading, in minutes
const FETCH_WINDOW_MINUTES: u32 = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn base_url(region: Region) -> &'static str {
    match region {
        Region::Us => US_BASE_URL,
        Region::Ous => OUS_BASE_URL,
        Region::Jp => JP_BASE_URL,
    }
}

fn application_id(region: Region) -> &'static str {
    match region {
        Region::Us | Region::Ous => APPLICATION_ID,
        Region::Jp => JP_APPLICATION_ID,
    }
}

/// One entry from `ReadPublisherLatestGlucoseValues`
#[derive(Debug, Deserialize)]
struct ShareGlucoseValue {
    #[serde(rename = "WT")]
    wt: String,
    #[serde(rename = "Value")]
    value: u16,
    #[serde(rename = "Trend")]
    trend: String,
}

/// Parse a Share timestamp of the form `Date(1691455258000)`
fn parse_share_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let millis = raw
        .strip_prefix("Date(")
        .and_then(|s| s.strip_suffix(')'))
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::Serialization(format!("Unparseable Share timestamp: {}", raw)))?;

    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::Serialization(format!("Share timestamp out of range: {}", raw)))
}

impl ShareGlucoseValue {
    fn into_sample(self) -> Result<GlucoseSample> {
        let timestamp = parse_share_timestamp(&self.wt)?;
        Ok(GlucoseSample::new(self.value, TrendCode::from_share(&self.trend))
            .with_timestamp(timestamp))
    }
}

/// Glucose reading source backed by the Dexcom Share API
pub struct DexcomSource {
    client: Client,
    account: AccountConfig,
    session_id: Option<String>,
}

impl DexcomSource {
    pub fn new(account: &AccountConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            account: account.clone(),
            session_id: None,
        })
    }

    /// Return the cached session id, authenticating if necessary
    fn ensure_session(&mut self) -> Result<String> {
        if let Some(id) = &self.session_id {
            return Ok(id.clone());
        }

        let base = base_url(self.account.region);
        let app_id = application_id(self.account.region);

        log::debug!("Authenticating Share account");
        let account_id: String = self
            .client
            .post(format!("{}/General/AuthenticatePublisherAccount", base))
            .json(&serde_json::json!({
                "accountName": self.account.username,
                "password": self.account.password,
                "applicationId": app_id,
            }))
            .send()?
            .error_for_status()
            .map_err(|e| Error::Auth(format!("account authentication rejected: {}", e)))?
            .json()?;

        let session_id: String = self
            .client
            .post(format!("{}/General/LoginPublisherAccountById", base))
            .json(&serde_json::json!({
                "accountId": account_id,
                "password": self.account.password,
                "applicationId": app_id,
            }))
            .send()?
            .error_for_status()
            .map_err(|e| Error::Auth(format!("session login rejected: {}", e)))?
            .json()?;

        if session_id == INVALID_SESSION_ID {
            return Err(Error::Auth(
                "Share returned the null session id; check username and password".to_string(),
            ));
        }

        log::info!("Dexcom Share session established");
        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    fn read_latest(&self, session_id: &str) -> Result<reqwest::blocking::Response> {
        let base = base_url(self.account.region);
        let minutes = FETCH_WINDOW_MINUTES.to_string();
        let response = self
            .client
            .post(format!("{}/Publisher/ReadPublisherLatestGlucoseValues", base))
            .query(&[
                ("sessionId", session_id),
                ("minutes", minutes.as_str()),
                ("maxCount", "1"),
            ])
            .send()?;
        Ok(response)
    }
}

impl ReadingSource for DexcomSource {
    fn fetch_current(&mut self) -> Result<Option<GlucoseSample>> {
        let session_id = self.ensure_session()?;

        let mut response = self.read_latest(&session_id)?;

        // The Share API answers 500 for an expired session; re-login once
        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            log::debug!("Share session expired, re-authenticating");
            self.session_id = None;
            let session_id = self.ensure_session()?;
            response = self.read_latest(&session_id)?;
        }

        let values: Vec<ShareGlucoseValue> = response.error_for_status()?.json()?;

        match values.into_iter().next() {
            Some(value) => Ok(Some(value.into_sample()?)),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "Dexcom Share"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_share_timestamp() {
        let ts = parse_share_timestamp("Date(1691455258000)").unwrap();
        assert_eq!(ts.timestamp_millis(), 1691455258000);
    }

    #[test]
    fn test_parse_share_timestamp_rejects_garbage() {
        assert!(parse_share_timestamp("1691455258000").is_err());
        assert!(parse_share_timestamp("Date(tomorrow)").is_err());
    }

    #[test]
    fn test_share_value_to_sample() {
        let value = ShareGlucoseValue {
            wt: "Date(1691455258000)".to_string(),
            value: 120,
            trend: "Flat".to_string(),
        };
        let sample = value.into_sample().unwrap();
        assert_eq!(sample.value_mg_dl, 120);
        assert_eq!(sample.trend, TrendCode::Flat);
    }

    #[test]
    fn test_unusable_trends_map_to_unknown() {
        for raw in ["None", "NotComputable", "RateOutOfRange", "whatever"] {
            assert_eq!(TrendCode::from_share(raw), TrendCode::Unknown);
        }
    }

    #[test]
    fn test_region_endpoints() {
        assert!(base_url(Region::Us).contains("share2.dexcom.com"));
        assert!(base_url(Region::Ous).contains("shareous1"));
        assert!(base_url(Region::Jp).contains("dexcom.jp"));
        assert_eq!(application_id(Region::Us), application_id(Region::Ous));
        assert_ne!(application_id(Region::Us), application_id(Region::Jp));
    }
}

use serde_json::Value;
use anyhow::{anyhow, Context};
use chrono::{NaiveDate, TimeZone, Utc};
use tracing::{debug, info};
use predictor_lib;
use crate::yahoo::utils;

static USER_AGENT : &str = "Mozilla/5.0 (X11; Linux x86_64) stock-predictor";

/// Daily close history from the Yahoo Finance chart API.
pub struct YahooHistorySource {
    base_url : String,
    client : reqwest::blocking::Client
}

impl YahooHistorySource {
    pub fn create(base_url : &str, timeout : std::time::Duration) -> anyhow::Result<YahooHistorySource> {
        utils::build_url(base_url, &[], &Vec::new()).with_context(|| format!("Invalid history url '{}'", base_url))?;
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!("Using history source {} (timeout {:?})", base_url, timeout);
        Ok(YahooHistorySource { base_url : String::from(base_url), client })
    }

    fn day_start_timestamp(date : &NaiveDate) -> anyhow::Result<i64> {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| anyhow!("Invalid date {}", date))?;
        Ok(Utc.from_utc_datetime(&midnight).timestamp())
    }

    fn create_history(json_root : &Value) -> anyhow::Result<Vec<predictor_lib::PriceStep>> {
        let chart = &json_root["chart"];
        if !chart["error"].is_null() {
            let description = chart["error"]["description"].as_str().unwrap_or("unknown error");
            return Err(anyhow!("Chart request failed: {}", description));
        }

        let result = &chart["result"][0];
        if result.is_null() {
            return Err(anyhow!("No 'chart/result' found in response: {}", json_root));
        }

        // Ranges without trading days come back without timestamps.
        let timestamps = match result["timestamp"].as_array() {
            Some(timestamps) => timestamps,
            None => return Ok(Vec::new())
        };
        let closes = result["indicators"]["quote"][0]["close"].as_array().
            ok_or_else(|| anyhow!("No 'indicators/quote/close' array in response: {}", result))?;
        if closes.len() != timestamps.len() {
            return Err(anyhow!("Got {} timestamps but {} closes", timestamps.len(), closes.len()));
        }

        let gmt_offset = result["meta"]["gmtoffset"].as_i64().unwrap_or(0);
        let mut history = Vec::new();
        for (timestamp, close) in timestamps.iter().zip(closes) {
            let close = match close.as_f64() {
                Some(close) => close,
                None => continue
            };
            let timestamp = timestamp.as_i64().ok_or_else(|| anyhow!("Could not read timestamp {}", timestamp))?;
            let date = Utc.timestamp_opt(timestamp + gmt_offset, 0).single().
                ok_or_else(|| anyhow!("Timestamp {} is out of range", timestamp))?.
                naive_utc().date();
            history.push(predictor_lib::PriceStep { date, close });
        }

        // The bar of the current session may be repeated, the later one is the most recent.
        history.dedup_by(|next, previous| {
            if next.date == previous.date {
                previous.close = next.close;
                true
            }
            else {
                false
            }
        });

        Ok(history)
    }
}

impl predictor_lib::HistorySource for YahooHistorySource {
    fn fetch_close_history(&mut self, symbol : &str, since_date : &NaiveDate,
                           to_date : &NaiveDate) -> anyhow::Result<Vec<predictor_lib::PriceStep>> {
        let http_params = vec!(
            (String::from("period1"), YahooHistorySource::day_start_timestamp(since_date)?.to_string()),
            (String::from("period2"), YahooHistorySource::day_start_timestamp(to_date)?.to_string()),
            (String::from("interval"), String::from("1d")),
            (String::from("events"), String::from("history")));
        let json_root = utils::http_get_json(&self.client, &self.base_url, &["v8", "finance", "chart", symbol], &http_params)?;

        let mut history = YahooHistorySource::create_history(&json_root)
            .with_context(|| format!("Unexpected chart response for {}", symbol))?;
        history.retain(|s| s.date >= *since_date && s.date < *to_date);

        debug!("Fetched {} daily closes for {} between {} and {}", history.len(), symbol, since_date, to_date);
        Ok(history)
    }
}

use serde_json::Value;
use anyhow::{anyhow, Context};
use tracing::debug;

pub fn http_get_json(client : &reqwest::blocking::Client, base_url : &str, path_segments : &[&str],
                     param_map : &Vec<(String, String)>) -> anyhow::Result<serde_json::Value> {
    let http_resp = http_get(client, base_url, path_segments, param_map).context("Failed to send HTTP GET")?;

    http_response_to_json(http_resp).context("Failed to parse HTTP response")
}

fn http_get(client : &reqwest::blocking::Client, base_url : &str, path_segments : &[&str],
            param_map : &Vec<(String, String)>) -> anyhow::Result<reqwest::blocking::Response> {
    let url = build_url(base_url, path_segments, param_map)?;
    debug!("GET {}", url);

    let resp = client
        .get(url)
        .header("Accept", "application/json")
        .send()?;
    Ok(resp)
}

pub fn build_url(base_url : &str, path_segments : &[&str], param_map : &Vec<(String, String)>) -> anyhow::Result<url::Url> {
    let mut url = url::Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("'{}' cannot be used as a base url", base_url))?
        .pop_if_empty()
        .extend(path_segments);
    if !param_map.is_empty() {
        url.query_pairs_mut().extend_pairs(param_map);
    }

    Ok(url)
}

fn http_response_to_json(response : reqwest::blocking::Response) -> anyhow::Result<serde_json::Value> {
    let status = response.status();
    let response_body = response.text()?;
    if status != http::StatusCode::OK {
        let body_start = response_body.chars().take(200).collect::<String>();
        return Err(anyhow!("Erroneous HTTP status returned: {}, body: {}", status, body_start));
    }

    let json_root : Value = serde_json::from_str(&response_body)?;

    Ok(json_root)
}

/// Single-shot GET against the relay endpoint.
use std::time::Duration;

use log::info;
use serde_json::Value;

use crate::config::StationConfig;
use crate::error::FetchError;
use crate::window::StationWindow;

/// Bound on the whole request, connect included. No retries happen inside
/// this module; retry policy belongs to the caller.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The upstream service rejects non-browser clients, so the relay (and we,
/// when talking to it) present browser-like headers.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Build a client with the fetch timeout applied. Reuse across loads.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(from_transport)
}

/// Perform the one GET for a station's window and parse the body as JSON.
///
/// The `+` inside the window strings is percent-encoded by the query
/// serializer; the relay decodes it and converts it back to the space the
/// upstream date format uses.
pub async fn fetch_window(
    client: &reqwest::Client,
    config: &StationConfig,
    window: &StationWindow,
) -> Result<Value, FetchError> {
    info!(
        "requesting {} window {} .. {}",
        config.station_code, window.date_begin, window.date_end
    );

    let response = client
        .get(&config.proxy_url)
        .query(&query_params(config, window))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .header(reqwest::header::ACCEPT, ACCEPT)
        .send()
        .await
        .map_err(from_transport)?;

    let status = response.status();
    let body = response.text().await.map_err(from_transport)?;

    if !status.is_success() {
        return Err(FetchError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|_| FetchError::BodyNotJson { body })
}

fn query_params<'a>(config: &'a StationConfig, window: &'a StationWindow) -> [(&'a str, &'a str); 3] {
    [
        ("code", config.station_code.as_str()),
        ("dateBegin", window.date_begin.as_str()),
        ("dateEnd", window.date_end.as_str()),
    ]
}

fn from_transport(err: reqwest::Error) -> FetchError {
    FetchError::Network {
        reason: err.to_string(),
        timed_out: err.is_timeout(),
    }
}

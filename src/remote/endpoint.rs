//! Endpoint selection: probe the primary, trust the fallback.

use std::time::Duration;
use tracing::info;

use crate::utils::errors::{AgentError, Result};

/// Pick the base URL for this run.
///
/// A configured primary is health-checked with a short timeout; HTTP 200
/// selects it, anything else falls through. A configured fallback is then
/// selected without a probe, so fallback unreachability surfaces at the
/// first real request. The choice is made once per run and never
/// re-evaluated, even if connectivity changes mid-run.
pub async fn select_base_url(
    primary: Option<&str>,
    fallback: Option<&str>,
    probe_timeout: Duration,
) -> Result<String> {
    if let Some(primary) = primary {
        info!("Checking connection to: {}", primary);
        if probe(primary, probe_timeout).await {
            info!("Primary endpoint reachable");
            return Ok(primary.trim_end_matches('/').to_string());
        }
    }

    if let Some(fallback) = fallback {
        info!("Switching to fallback endpoint: {}", fallback);
        return Ok(fallback.trim_end_matches('/').to_string());
    }

    Err(AgentError::Connectivity(match primary {
        Some(primary) => format!(
            "{} failed its health probe and no fallback is configured",
            primary
        ),
        None => "no primary or fallback endpoint configured".to_string(),
    }))
}

/// Health probe against the ping route. Only HTTP 200 counts as reachable;
/// timeouts, transport errors, and other statuses all fail the probe.
async fn probe(base_url: &str, timeout: Duration) -> bool {
    let url = format!("{}/api/server/ping", base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    match client.get(&url).timeout(timeout).send().await {
        Ok(resp) => resp.status() == reqwest::StatusCode::OK,
        Err(_) => false,
    }
}

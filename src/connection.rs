use std::time::Duration;

use crate::check::CheckResult;

/// hard cap; a probe must never hang an admin request
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// GET the url and report whether it answered. Credentials go out as HTTP
/// basic auth when a username is given. This never touches the history
/// store, so a slow endpoint cannot block recording.
pub async fn test_connection(
    url: &str,
    username: Option<&str>,
    password: Option<&str>,
) -> CheckResult {
    if url.trim().is_empty() {
        return CheckResult::Error("url is empty; nothing to probe".to_string());
    }

    let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => return CheckResult::Error(e.to_string()),
    };

    let mut request = client.get(url);
    if let Some(username) = username.filter(|u| !u.is_empty()) {
        request = request.basic_auth(username, password);
    }

    match request.send().await {
        Ok(res) if res.status() == reqwest::StatusCode::OK => CheckResult::Ok(format!(
            "connection successful (HTTP {})",
            res.status().as_u16()
        )),
        Ok(res) => CheckResult::Warning(format!("HTTP {}", res.status().as_u16())),
        Err(e) => CheckResult::Error(e.to_string()),
    }
}

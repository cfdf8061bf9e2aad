use crate::error::{ClientError, Result};
use log::{error, info};
use reqwest::{Client, IntoUrl, Method, Response};
use serde::Serialize;
use std::sync::Arc;

/// Executes an HTTP request with common configuration and error handling.
/// Failures are returned to the caller as-is; there is no retry.
pub async fn execute_request<T: Serialize + ?Sized>(
    client: &Arc<Client>,
    method: Method,
    url: impl IntoUrl,
    auth_token: Option<&str>,
    json_body: Option<&T>,
) -> Result<Response> {
    let url_val = url.into_url().map_err(ClientError::Http)?;
    let mut request_builder = client.request(method.clone(), url_val.clone());

    if let Some(token) = auth_token {
        request_builder = request_builder.header("Authorization", format!("Bearer {}", token));
    }

    if let Some(body) = json_body {
        request_builder = request_builder.json(body);
    }

    info!("Sending {} request to {}", method.as_str(), url_val);
    let start_time = std::time::Instant::now();

    match request_builder.send().await {
        Ok(resp) => {
            info!(
                "Got response from {} after {:?} with status {}",
                url_val,
                start_time.elapsed(),
                resp.status()
            );
            Ok(resp)
        }
        Err(e) => {
            error!("Failed HTTP request to {}: {}", url_val, e);
            if e.is_timeout() {
                error!("Request timed out");
            }
            if e.is_connect() {
                error!("Connection error");
            }
            Err(ClientError::Http(e))
        }
    }
}

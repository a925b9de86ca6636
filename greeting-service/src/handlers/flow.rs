//! HTTP adapter for flows.
//!
//! The handler is the only reader of the request body. It checks the
//! content type from the headers, takes the body once as `Bytes`, validates
//! it through the flow and invokes the flow with the typed value.

use crate::flows::{Flow, FlowError};
use crate::services::record_flow_invocation;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use std::sync::Arc;

pub async fn run_flow<F: Flow>(
    State(flow): State<Arc<F>>,
    request: Request,
) -> Result<Response, AppError> {
    let name = flow.descriptor().name;

    if let Err(e) = require_json(request.headers()) {
        record_flow_invocation(name, "rejected");
        return Err(e.into());
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(|rejection| {
            record_flow_invocation(name, "rejected");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(rejection.body_text())
            } else {
                AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
            }
        })?;

    let input = flow.validate(&body).map_err(|e| {
        tracing::warn!(flow = name, error = %e, "Rejected flow input");
        record_flow_invocation(name, "rejected");
        AppError::from(e)
    })?;

    match flow.invoke(input).await {
        Ok(output) => {
            record_flow_invocation(name, "ok");
            Ok(output.into_response())
        }
        Err(e) => {
            tracing::error!(flow = name, error = %e, "Flow failed");
            record_flow_invocation(name, "error");
            Err(e.into())
        }
    }
}

/// Accepts `application/json` and `application/*+json`, with parameters.
fn require_json(headers: &HeaderMap) -> Result<(), FlowError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| FlowError::UnsupportedMediaType("no content type".to_string()))?;

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let is_json = essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"));

    if is_json {
        Ok(())
    } else {
        Err(FlowError::UnsupportedMediaType(content_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_accepts_json_variants() {
        assert!(require_json(&headers_with("application/json")).is_ok());
        assert!(require_json(&headers_with("application/json; charset=utf-8")).is_ok());
        assert!(require_json(&headers_with("Application/JSON")).is_ok());
        assert!(require_json(&headers_with("application/vnd.greeting+json")).is_ok());
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(require_json(&HeaderMap::new()).is_err());
        assert!(require_json(&headers_with("text/plain")).is_err());
        assert!(require_json(&headers_with("application/x-www-form-urlencoded")).is_err());
        assert!(require_json(&headers_with("application/jsonp")).is_err());
    }
}

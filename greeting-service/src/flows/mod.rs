//! Flow abstractions.
//!
//! A flow is a named, schema-typed asynchronous function exposed over HTTP.
//! The request adapter hands the raw body to [`Flow::validate`] exactly once
//! and passes the typed value to [`Flow::invoke`].

pub mod hello;

use async_trait::async_trait;
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::error::AppError;
use thiserror::Error;

pub use hello::{GreetingRequest, HelloFlow};

/// Error type for flow operations.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Expected application/json, got {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Flow execution failed: {0}")]
    Execution(#[from] anyhow::Error),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::UnsupportedMediaType(got) => AppError::UnsupportedMediaType(got),
            FlowError::MalformedJson(msg) => {
                AppError::BadRequest(anyhow::anyhow!("Malformed JSON body: {}", msg))
            }
            FlowError::InvalidInput(msg) => AppError::ValidationError(msg),
            FlowError::Execution(err) => AppError::InternalError(err),
        }
    }
}

/// Registration metadata for a flow.
#[derive(Debug, Clone)]
pub struct FlowDescriptor {
    /// Symbolic name; the flow is served at `/{name}`.
    pub name: &'static str,

    /// Declared input shape.
    pub input_schema: Value,

    /// Declared output shape.
    pub output_schema: Value,
}

impl FlowDescriptor {
    pub fn route_path(&self) -> String {
        format!("/{}", self.name)
    }
}

/// A validating, invocable flow.
#[async_trait]
pub trait Flow: Send + Sync + 'static {
    type Input: Send;
    type Output: IntoResponse + Send;

    fn descriptor(&self) -> &FlowDescriptor;

    /// Parse and validate the raw request body.
    fn validate(&self, raw: &[u8]) -> Result<Self::Input, FlowError>;

    /// Run the flow on a validated input.
    async fn invoke(&self, input: Self::Input) -> Result<Self::Output, FlowError>;
}

/// Decode a JSON object body into `T`, separating unparseable bodies from
/// well-formed documents of the wrong shape.
pub fn parse_json_input<T: DeserializeOwned>(raw: &[u8]) -> Result<T, FlowError> {
    use serde_json::error::Category;

    let value: Value = serde_json::from_slice(raw).map_err(|e| match e.classify() {
        Category::Data => FlowError::InvalidInput(e.to_string()),
        Category::Syntax | Category::Eof | Category::Io => FlowError::MalformedJson(e.to_string()),
    })?;

    // Serde accepts sequences for structs; flow inputs are objects only.
    if !value.is_object() {
        return Err(FlowError::InvalidInput(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| FlowError::InvalidInput(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

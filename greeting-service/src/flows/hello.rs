//! The `helloFlow` greeting flow.

use super::{parse_json_input, Flow, FlowDescriptor, FlowError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const HELLO_FLOW_NAME: &str = "helloFlow";

/// Input of `helloFlow`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingRequest {
    pub name: String,
}

pub struct HelloFlow {
    descriptor: FlowDescriptor,
}

impl HelloFlow {
    pub fn new() -> Self {
        Self {
            descriptor: FlowDescriptor {
                name: HELLO_FLOW_NAME,
                input_schema: json!({
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                }),
                output_schema: json!({ "type": "string" }),
            },
        }
    }
}

impl Default for HelloFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// `Hello, <name>`. Empty names are greeted as-is.
pub fn greet(request: &GreetingRequest) -> String {
    format!("Hello, {}", request.name)
}

#[async_trait]
impl Flow for HelloFlow {
    type Input = GreetingRequest;
    type Output = String;

    fn descriptor(&self) -> &FlowDescriptor {
        &self.descriptor
    }

    fn validate(&self, raw: &[u8]) -> Result<GreetingRequest, FlowError> {
        parse_json_input(raw)
    }

    async fn invoke(&self, input: GreetingRequest) -> Result<String, FlowError> {
        tracing::info!(flow = HELLO_FLOW_NAME, input = ?input, "Received input");
        Ok(greet(&input))
    }
}

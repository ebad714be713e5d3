use std::future::ready;

use chrono::Utc;
use deskhand_core::op::{OpResult, Operation};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize, JsonSchema)]
pub struct CurrentTimeParameters {}

/// An operation that reports the current time and date.
pub struct CurrentTimeOp {
    parameter_schema: Value,
}

impl CurrentTimeOp {
    /// Creates the operation.
    #[inline]
    pub fn new() -> Self {
        Self {
            parameter_schema: schema_for!(CurrentTimeParameters).to_value(),
        }
    }
}

impl Default for CurrentTimeOp {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for CurrentTimeOp {
    type Input = CurrentTimeParameters;

    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        r#"
Reports the current UTC time and date, for anchoring phrases like "today" before other calls."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        _input: Self::Input,
    ) -> impl Future<Output = OpResult> + Send + 'static {
        let now = Utc::now();
        ready(Ok(json!({
            "current_time": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            "formatted_date": now.format("%m-%d-%Y").to_string(),
            "message": format!("It is {} UTC", now.format("%Y-%m-%d %H:%M")),
        })))
    }
}

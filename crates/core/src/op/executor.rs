use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::Instrument;

use super::object::{AnyOperation, OpObject};
use super::{Error, Operation};

/// Describes a registered operation for front ends that need schemas
/// (an LLM tool declaration, a help listing).
#[derive(Clone, Debug, Serialize)]
pub struct OpDefinition {
    /// Name of the operation.
    pub name: String,
    /// Description of the operation.
    pub description: String,
    /// Parameters definition of the operation, as a JSON schema.
    pub parameters: Value,
}

/// An executor that dispatches named operation calls.
///
/// Whatever happens inside an operation, [`Executor::call`] always
/// returns a structured `{status, ...}` object: success payloads gain a
/// `status` field, expected failures and provider errors are converted
/// into `{status: "error", message, kind, retryable}` rather than
/// surfacing as raw errors.
#[derive(Default)]
pub struct Executor {
    ops: HashMap<String, Box<dyn OpObject>>,
}

impl Executor {
    /// Registers an operation under its own name.
    pub fn register<T: Operation>(&mut self, op: T) {
        let name = op.name().to_owned();
        self.ops.insert(name, Box::new(AnyOperation(op)));
    }

    /// Returns the definitions of every registered operation.
    pub fn definitions(&self) -> Vec<OpDefinition> {
        let mut definitions: Vec<OpDefinition> = self
            .ops
            .values()
            .map(|op| OpDefinition {
                name: op.name().to_owned(),
                description: op.description().to_owned(),
                parameters: op.parameter_schema().clone(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Invokes an operation by name with JSON arguments.
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        let span = debug_span!("op dispatch", op = name);
        async {
            let Some(op) = self.ops.get(name) else {
                warn!("operation not found: {name}");
                return error_value(
                    Error::invalid_input()
                        .with_reason(format!("unknown operation: {name}")),
                );
            };
            trace!("invoking with args: {arguments:?}");
            match op.execute(arguments).await {
                Ok(payload) => success_value(payload),
                Err(err) => error_value(err),
            }
        }
        .instrument(span)
        .await
    }
}

fn success_value(payload: Value) -> Value {
    let mut object = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_owned(), other);
            map
        }
    };
    object
        .entry("status".to_owned())
        .or_insert_with(|| json!("success"));
    Value::Object(object)
}

fn error_value(err: Error) -> Value {
    json!({
        "status": "error",
        "message": err.reason(),
        "kind": err.kind().as_str(),
        "retryable": err.kind().is_retryable(),
    })
}

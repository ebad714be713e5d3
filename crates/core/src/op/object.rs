use std::pin::Pin;

use serde_json::Value;

use super::{Error, OpResult, Operation};

pub(crate) trait OpObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameter_schema(&self) -> &Value;

    fn execute(
        &self,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = OpResult> + Send>>;
}

pub(crate) struct AnyOperation<T: Operation>(pub T);

impl<T: Operation> OpObject for AnyOperation<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    #[inline]
    fn parameter_schema(&self) -> &Value {
        self.0.parameter_schema()
    }

    #[inline]
    fn execute(
        &self,
        arguments: Value,
    ) -> Pin<Box<dyn Future<Output = OpResult> + Send>> {
        let input: T::Input = match serde_json::from_value(arguments) {
            Ok(input) => input,
            Err(err) => {
                let reason = format!("{err}");
                return Box::pin(std::future::ready(OpResult::Err(
                    Error::invalid_input().with_reason(reason),
                )));
            }
        };
        Box::pin(self.0.execute(input))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Accumulation window lock poisoned during {context}.")]
    LockPoisoned { context: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

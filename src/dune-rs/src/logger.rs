/// Sink for the client's diagnostic messages.
///
/// Methods are infallible: a logger must never make an API call fail.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards everything. Used when no logger is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards messages to the `tracing` facade under the `dune_rs` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "dune_rs", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "dune_rs", "{}", message);
    }
}

use tracing::error;

use crate::ports::ErrorReporter;

/// Reports captured errors as `tracing` error events, with the full source
/// chain, so the configured subscriber decides where they land.
#[derive(Debug, Clone, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn capture(&self, error: &(dyn std::error::Error + 'static)) {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        error!(error = %error, causes = ?chain, "Captured error");
    }
}

use crate::domain::{DeadLetterQueue, Error};

/// Reports rejected instructions through the tracing pipeline with their
/// stable error code.
#[derive(Default, Debug)]
pub struct TracingDlq {}

impl DeadLetterQueue for TracingDlq {
    fn report(&self, error: &Error) {
        tracing::warn!(code = error.code(), "instruction rejected: {error}");
    }
}

use std::thread;
use std::time::Duration;

use crate::domain::Error;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(10);

/// Bounded retry with exponential backoff, applied only to transient
/// storage failures. Deterministic rejections surface immediately.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl Policy {
    pub fn run<T, F>(&self, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Result<T, Error>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Err(err) if err.is_transient() && attempt + 1 < self.attempts.max(1) => {
                    attempt += 1;
                    tracing::warn!(code = err.code(), attempt, "transient storage failure, retrying");
                    thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
                }
                other => return other,
            }
        }
    }
}

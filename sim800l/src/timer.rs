use embassy_time::{Duration, Instant};

/// A point in time after which a blocking transport operation gives up.
///
/// A timeout too large to be represented, `Duration::MAX` in particular,
/// never expires.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(timeout),
        }
    }

    pub fn has_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Instant::now(),
            None => false,
        }
    }

    /// Call `poll` until it yields a value or the deadline passes.
    pub fn poll<R, E>(
        &self,
        on_timeout: E,
        mut poll: impl FnMut() -> Result<Option<R>, E>,
    ) -> Result<R, E> {
        loop {
            if let Some(res) = poll()? {
                return Ok(res);
            }
            if self.has_expired() {
                return Err(on_timeout);
            }
        }
    }
}

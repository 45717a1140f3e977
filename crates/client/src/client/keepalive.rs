//! Keepalive refresh timer.
//!
//! The timer is a tokio task that sleeps for `timeout * refresh_ratio` and then
//! refreshes the session. It holds only a weak reference to the session, so an
//! outstanding timer never keeps a dropped client alive, and tokio tasks never
//! block runtime shutdown.
//!
//! # Invariants
//! - Each timer carries a generation number; a timer fires only if its
//!   generation still occupies the slot, so a superseded timer is a no-op
//! - Arming a timer aborts the previous one first

use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{RefreshTimer, SessionInner, SessionState};
use crate::error::{ClientError, Result};

/// Delay before the keepalive refresh fires.
pub(super) fn refresh_delay(timeout: Duration, ratio: f64) -> Duration {
    timeout.mul_f64(ratio)
}

/// Instant at which a refresh `delay` from `now` fires, if representable.
pub(super) fn refresh_deadline(now: Instant, delay: Duration) -> Option<Instant> {
    now.checked_add(delay)
}

/// Abort the pending timer, if any. Returns whether one was pending.
pub(super) fn cancel_timer(state: &mut SessionState) -> bool {
    match state.timer.take() {
        Some(timer) => {
            timer.handle.abort();
            debug!(generation = timer.generation, "Cancelled keepalive timer");
            true
        }
        None => false,
    }
}

impl SessionInner {
    /// Schedule a refresh `timeout * refresh_ratio` from now.
    ///
    /// Must be called from within a tokio runtime. The previous timer is
    /// cancelled even when the new deadline cannot be represented.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidResponse`] when the deadline overflows
    /// the clock; no task is spawned in that case.
    pub(super) fn arm_refresh_timer(
        self: &Arc<Self>,
        state: &mut SessionState,
        timeout: Duration,
    ) -> Result<()> {
        cancel_timer(state);

        let delay = refresh_delay(timeout, self.refresh_ratio);
        let deadline = refresh_deadline(Instant::now(), delay).ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "session timeout of {}s is too large to schedule",
                timeout.as_secs()
            ))
        })?;

        let generation = state.next_generation;
        state.next_generation += 1;

        let handle = tokio::spawn(fire_after(Arc::downgrade(self), generation, delay));
        state.timer = Some(RefreshTimer {
            generation,
            deadline,
            handle,
        });
        debug!(generation, ?delay, "Armed keepalive timer");
        Ok(())
    }

    /// Take the timer slot if `generation` still owns it.
    fn claim_timer(&self, generation: u64) -> bool {
        let mut state = self.lock_state();
        match &state.timer {
            Some(timer) if timer.generation == generation => {
                state.timer = None;
                true
            }
            _ => false,
        }
    }
}

fn fire_after(session: Weak<SessionInner>, generation: u64, delay: Duration) -> BoxFuture<'static, ()> {
    async move {
        tokio::time::sleep(delay).await;

        let Some(inner) = session.upgrade() else {
            return;
        };
        if !inner.claim_timer(generation) {
            return;
        }

        debug!(generation, "Keepalive timer fired");
        if let Err(e) = inner.refresh().await {
            warn!(error = %e, "Keepalive refresh failed");
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_delay_uses_ratio() {
        assert_eq!(
            refresh_delay(Duration::from_secs(600), 0.9),
            Duration::from_secs(540)
        );
        assert_eq!(
            refresh_delay(Duration::from_secs(300), 1.0),
            Duration::from_secs(300)
        );
        assert_eq!(
            refresh_delay(Duration::from_secs(1), 0.5),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_refresh_deadline_overflow() {
        let now = Instant::now();
        assert_eq!(
            refresh_deadline(now, Duration::from_secs(540)),
            Some(now + Duration::from_secs(540))
        );
        assert!(refresh_deadline(now, Duration::MAX).is_none());
    }

    #[test]
    fn test_cancel_without_timer_is_noop() {
        let mut state = SessionState::default();
        assert!(!cancel_timer(&mut state));
        assert!(state.timer.is_none());
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_timer() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        let mut state = SessionState {
            timer: Some(RefreshTimer {
                generation: 7,
                deadline: Instant::now() + Duration::from_secs(3600),
                handle,
            }),
            ..SessionState::default()
        };

        assert!(cancel_timer(&mut state));
        assert!(state.timer.is_none());
        assert!(!cancel_timer(&mut state));
    }
}

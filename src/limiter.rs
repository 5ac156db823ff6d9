//! Global request admission control
//!
//! A single token is replenished once per interval and shared by every
//! route. Requests that arrive while the token is spent are turned away
//! immediately instead of being queued.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Default replenishment interval: one request per second
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Single-token bucket refilled on a fixed interval
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    /// Earliest instant at which the token is available again
    next_token_at: Mutex<Instant>,
}

impl RateLimiter {
    /// Creates a limiter whose token is available immediately
    ///
    /// An `interval` of zero admits every request.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_token_at: Mutex::new(Instant::now()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tries to take the token without blocking
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> bool {
        if self.interval.is_zero() {
            return true;
        }
        let mut next = self
            .next_token_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if now < *next {
            return false;
        }
        *next = now + self.interval;
        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

/// Middleware state: the shared limiter plus the name of the guarded handler
#[derive(Debug, Clone)]
pub struct RateGate {
    limiter: Arc<RateLimiter>,
    label: &'static str,
}

impl RateGate {
    pub fn new(limiter: Arc<RateLimiter>, label: &'static str) -> Self {
        Self { limiter, label }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Runs the wrapped handler only if the shared token can be taken
///
/// Use with `axum::middleware::from_fn_with_state`. Rejected requests get
/// `429 Too Many Requests` and the handler is never invoked.
pub async fn enforce(State(gate): State<RateGate>, request: Request, next: Next) -> Response {
    if gate.limiter.try_acquire() {
        return next.run(request).await;
    }
    tracing::warn!(handler = gate.label, "{}: rate limit exceeded", gate.label);
    (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").into_response()
}

//! Per-IP rate limiting for `/api/*`.
//!
//! Each client IP owns a fixed window described by a [`Quota`]: at most
//! `max` requests are admitted until `window` has elapsed since the
//! window opened, then the count starts over. The default quota admits
//! 100 requests per 15-minute window. Rejected requests get a 429 with a
//! `Retry-After` hint pointing at the end of the current window.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    http::{header::RETRY_AFTER, Extensions, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;
use tracing::warn;

use ideaboard_shared::constants::{RATE_LIMIT_MAX, RATE_LIMIT_WINDOW_SECS};

/// Requests allowed per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub max: u32,
    pub window: Duration,
}

impl Quota {
    /// `max` requests per `window_secs`.
    pub fn per_window(max: u32, window_secs: u64) -> Self {
        Self {
            max,
            window: Duration::from_secs(window_secs.max(1)),
        }
    }
}

#[derive(Debug, Clone)]
struct Window {
    opened: Instant,
    used: u32,
}

impl Window {
    fn open(now: Instant) -> Self {
        Self { opened: now, used: 0 }
    }

    /// Count one request, or report how long until the window resets.
    fn take(&mut self, quota: &Quota, now: Instant) -> Result<(), Duration> {
        if now.saturating_duration_since(self.opened) >= quota.window {
            *self = Window::open(now);
        }

        if self.used < quota.max {
            self.used += 1;
            return Ok(());
        }
        Err((self.opened + quota.window).saturating_duration_since(now))
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    quota: Quota,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    pub fn new(quota: Quota) -> Self {
        Self {
            quota,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn per_window(max: u32, window_secs: u64) -> Self {
        Self::new(Quota::per_window(max, window_secs))
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    /// Spend one request for `ip`. `Err` carries the wait before the next
    /// request would be admitted.
    pub async fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows
            .entry(ip)
            .or_insert_with(|| Window::open(now))
            .take(&self.quota, now)
    }

    /// Forget clients whose window opened more than `max_idle` ago. With
    /// `max_idle` at least one window long, a dropped client would have
    /// started a fresh window anyway.
    pub async fn purge_stale(&self, max_idle: Duration) {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.opened) < max_idle);
        let dropped = before - windows.len();
        if dropped > 0 {
            tracing::debug!(dropped, remaining = windows.len(), "purged idle rate-limit windows");
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::per_window(RATE_LIMIT_MAX, RATE_LIMIT_WINDOW_SECS)
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    // Requests with no identifiable address are not limited.
    let Some(ip) = client_ip(req.extensions(), req.headers()) else {
        return next.run(req).await;
    };

    match limiter.check(ip).await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            warn!(%ip, retry_after_secs = wait.as_secs(), "rate limit exceeded");
            let body = Json(serde_json::json!({
                "error": "Too many requests, please try again later"
            }));
            let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            let secs = wait.as_secs_f64().ceil().max(1.0) as u64;
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
    }
}

/// The caller's address: the socket peer when known, else the first
/// `X-Forwarded-For` hop, else `X-Real-IP`.
pub fn client_ip(extensions: &Extensions, headers: &HeaderMap) -> Option<IpAddr> {
    let header_ip = |name: &str, first_hop: bool| {
        let raw = headers.get(name)?.to_str().ok()?;
        let candidate = if first_hop { raw.split(',').next()? } else { raw };
        candidate.trim().parse::<IpAddr>().ok()
    };

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .or_else(|| header_ip("x-forwarded-for", true))
        .or_else(|| header_ip("x-real-ip", false))
}

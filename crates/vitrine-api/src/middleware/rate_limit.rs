//! Per-IP rate limiting for the public slideshow route
//!
//! Fixed-window counters keyed by client IP, held in memory. A display wall
//! polling once a minute stays far under the limit; the limiter exists to
//! keep one misbehaving client from monopolizing the feed.
//!
//! # Headers
//! - `X-RateLimit-Limit`: requests allowed per window
//! - `X-RateLimit-Remaining`: requests left in the current window
//! - `Retry-After`: seconds until the window resets (429 responses only)

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::utils::ip::client_ip;

const WINDOW_SECONDS: u64 = 60;
// Bucket map is bounded; expired entries are dropped once this is reached.
const MAX_BUCKETS: usize = 10_000;

#[derive(Clone)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn new() -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + Duration::from_secs(WINDOW_SECONDS),
        }
    }

    /// Count a request. Returns whether it is allowed and how many more fit
    /// in the window.
    fn check_and_increment(&mut self, limit: u32) -> (bool, u32) {
        let now = Instant::now();

        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + Duration::from_secs(WINDOW_SECONDS);
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }

    fn reset_in(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// In-memory fixed-window rate limiter.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, RateLimitBucket>>,
    limit_per_minute: u32,
}

impl RateLimiter {
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            limit_per_minute,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit_per_minute
    }

    /// Ok(remaining) when the request is allowed, Err(reset_in) when not.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut buckets = self.buckets.lock().await;

        if buckets.len() >= MAX_BUCKETS {
            let now = Instant::now();
            buckets.retain(|_, bucket| bucket.reset_at > now);
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(RateLimitBucket::new);

        let (allowed, remaining) = bucket.check_and_increment(self.limit_per_minute);
        if allowed {
            Ok(remaining)
        } else {
            Err(bucket.reset_in())
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let socket_addr = request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0);
    let ip = client_ip(request.headers(), socket_addr.as_ref());
    let limit = limiter.limit();

    match limiter.check(&ip).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            set_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            set_header(
                &mut response,
                "X-RateLimit-Remaining",
                &remaining.to_string(),
            );
            response
        }
        Err(reset_in) => {
            tracing::warn!(client_ip = %ip, path = %request.uri().path(), "Rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(serde_json::json!({
                    "success": false,
                    "message": "Too many requests. Please slow down.",
                })),
            )
                .into_response();

            set_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            set_header(&mut response, "X-RateLimit-Remaining", "0");
            set_header(
                &mut response,
                "Retry-After",
                &reset_in.as_secs().max(1).to_string(),
            );
            response
        }
    }
}

fn set_header(response: &mut Response, name: &'static str, value: &str) {
    if let Ok(header_value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(name, header_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_enforced_per_key() {
        let limiter = RateLimiter::new(3);

        for expected_remaining in [2, 1, 0] {
            assert_eq!(limiter.check("ip-a").await, Ok(expected_remaining));
        }
        assert!(limiter.check("ip-a").await.is_err());

        // A different key has its own bucket
        assert_eq!(limiter.check("ip-b").await, Ok(2));
    }

    #[tokio::test]
    async fn test_rejection_reports_reset() {
        let limiter = RateLimiter::new(1);
        limiter.check("ip").await.unwrap();

        let reset_in = limiter.check("ip").await.unwrap_err();
        assert!(reset_in <= Duration::from_secs(WINDOW_SECONDS));
    }
}

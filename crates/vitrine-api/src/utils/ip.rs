//! Client IP extraction
//!
//! Rate-limit keys come from the client address. Behind a proxy the socket
//! address is the proxy's, so `X-Forwarded-For` and `X-Real-IP` are consulted
//! first; values that do not parse as IPs are ignored rather than trusted.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Best available client IP as a string, `"unknown"` when nothing validates.
pub fn client_ip(headers: &HeaderMap, socket_addr: Option<&std::net::SocketAddr>) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded_for.to_str() {
            // First hop of the chain is the original client
            if let Some(first) = value.split(',').next() {
                let candidate = first.trim();
                if is_valid_ip(candidate) {
                    return candidate.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            let candidate = value.trim();
            if is_valid_ip(candidate) {
                return candidate.to_string();
            }
        }
    }

    if let Some(addr) = socket_addr {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

fn is_valid_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

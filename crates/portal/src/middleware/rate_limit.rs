//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Registration submissions are limited per client IP so the form cannot be
//! used to flood the registrations table.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Custom key extractor for the portal's reverse proxies.
///
/// Checks `Fly-Client-IP`, then the first `X-Forwarded-For` hop, then
/// `X-Real-IP`, and finally the TCP peer address.
#[derive(Clone, Copy)]
pub struct ForwardedIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ForwardedIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // Fly.io's header
        if let Some(ip) = headers
            .get("fly-client-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // X-Forwarded-For (first IP in the chain)
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ForwardedIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for registration submissions: ~5 per minute per IP.
///
/// # Panics
///
/// This function will not panic. `per_second(12)` and `burst_size(3)` are
/// valid positive values for `GovernorConfigBuilder`.
#[must_use]
pub fn registration_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ForwardedIpKeyExtractor)
        .per_second(12) // Replenish 1 token every 12 seconds
        .burst_size(3)
        .finish()
        .expect("rate limiter config with per_second(12) and burst_size(3) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/register/abc")
    }

    #[test]
    fn test_fly_header_wins() {
        let req = request()
            .header("fly-client-ip", "192.0.2.10")
            .header("x-forwarded-for", "203.0.113.7")
            .body(())
            .unwrap();
        assert_eq!(
            ForwardedIpKeyExtractor.extract(&req).unwrap().to_string(),
            "192.0.2.10"
        );
    }

    #[test]
    fn test_first_forwarded_hop() {
        let req = request()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(
            ForwardedIpKeyExtractor.extract(&req).unwrap().to_string(),
            "203.0.113.7"
        );
    }

    #[test]
    fn test_peer_address_fallback() {
        let mut req = request().header("x-real-ip", "garbage").body(()).unwrap();
        let peer: SocketAddr = "198.51.100.4:40000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(
            ForwardedIpKeyExtractor.extract(&req).unwrap().to_string(),
            "198.51.100.4"
        );
    }

    #[test]
    fn test_unknown_client() {
        let req = request().body(()).unwrap();
        assert!(ForwardedIpKeyExtractor.extract(&req).is_err());
    }
}

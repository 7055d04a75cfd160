//! Client key derivation for rate limiting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Where the client identity is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Proxy headers first, then the socket peer address
    ForwardedFor,
    /// Socket peer address only
    PeerAddress,
}

/// Derives the rate limit key for an incoming request
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    strategy: KeyStrategy,
}

const FORWARDED_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "client-ip"];

impl KeyGenerator {
    pub fn new(strategy: KeyStrategy) -> Self {
        Self { strategy }
    }

    pub fn from_trust(trust_forwarded_headers: bool) -> Self {
        if trust_forwarded_headers {
            Self::new(KeyStrategy::ForwardedFor)
        } else {
            Self::new(KeyStrategy::PeerAddress)
        }
    }

    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Generate a client key from request headers and the peer address
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        if self.strategy == KeyStrategy::ForwardedFor {
            if let Some(ip) = forwarded_ip(headers) {
                return ip;
            }
        }

        match peer {
            Some(addr) => addr.ip().to_string(),
            None => "unknown".to_string(),
        }
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    FORWARDED_HEADERS.iter().find_map(|name| {
        let value = headers.get(*name)?.to_str().ok()?;
        // x-forwarded-for lists every hop; the first is the client
        let first = value.split(',').next()?.trim();
        (!first.is_empty()).then(|| first.to_string())
    })
}

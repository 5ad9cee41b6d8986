use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use webscope_core::ScopeError;

/// Address block in CIDR notation; a bare address is a full-length prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpBlock {
    network: IpAddr,
    prefix: u8,
}

impl IpBlock {
    pub fn parse(raw: &str) -> Result<Self, ScopeError> {
        let raw = raw.trim();
        let invalid = || ScopeError::Config(format!("invalid allowed IP entry: {}", raw));

        let (addr, prefix) = match raw.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (raw, None),
        };
        let network: IpAddr = addr.parse().map_err(|_| invalid())?;
        let max = if network.is_ipv4() { 32 } else { 128 };
        let prefix = match prefix {
            Some(p) => p.parse::<u8>().map_err(|_| invalid())?,
            None => max,
        };
        if prefix > max {
            return Err(invalid());
        }

        Ok(Self { network, prefix })
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.network, canonical(ip)) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = u32::MAX.checked_shl(32 - self.prefix as u32).unwrap_or(0);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = u128::MAX.checked_shl(128 - self.prefix as u32).unwrap_or(0);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

/// IPv4 clients reaching a dual-stack listener show up as ::ffff:a.b.c.d
fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    blocks: Vec<IpBlock>,
}

impl AccessPolicy {
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self, ScopeError> {
        let blocks = entries
            .iter()
            .map(|e| IpBlock::parse(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blocks })
    }

    /// An empty policy allows everyone
    pub fn allows(&self, ip: IpAddr) -> bool {
        self.blocks.is_empty() || self.blocks.iter().any(|b| b.contains(ip))
    }
}

pub async fn allow_list_middleware(
    State(policy): State<Arc<AccessPolicy>>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let ip = client_addr.ip();
    if policy.allows(ip) {
        Ok(next.run(req).await)
    } else {
        warn!("rejected request from {} to {}", ip, req.uri().path());
        Err(StatusCode::FORBIDDEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_allows_all_ipv4() {
        let policy = AccessPolicy::from_entries(&["0.0.0.0/0"]).unwrap();
        assert!(policy.allows(ip("203.0.113.9")));
        assert!(policy.allows(ip("127.0.0.1")));
        assert!(policy.allows(ip("::ffff:10.1.2.3")));
        assert!(!policy.allows(ip("2001:db8::1")));
    }

    #[test]
    fn test_cidr_and_bare_addresses() {
        let policy = AccessPolicy::from_entries(&["10.0.0.0/8", "192.168.1.5", "2001:db8::/32"]).unwrap();

        assert!(policy.allows(ip("10.255.0.1")));
        assert!(policy.allows(ip("192.168.1.5")));
        assert!(policy.allows(ip("2001:db8:1::7")));
        assert!(!policy.allows(ip("11.0.0.1")));
        assert!(!policy.allows(ip("192.168.1.6")));
        assert!(!policy.allows(ip("2001:db9::1")));
    }

    #[test]
    fn test_empty_policy_allows_everyone() {
        let policy = AccessPolicy::from_entries::<&str>(&[]).unwrap();
        assert!(policy.allows(ip("198.51.100.1")));
    }

    #[test]
    fn test_invalid_entries() {
        assert!(IpBlock::parse("10.0.0.0/33").is_err());
        assert!(IpBlock::parse("not-an-ip").is_err());
        assert!(IpBlock::parse("10.0.0.0/x").is_err());
        assert!(IpBlock::parse("::1/129").is_err());
        assert!(IpBlock::parse("::1/128").is_ok());
    }
}

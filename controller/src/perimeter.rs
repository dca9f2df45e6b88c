//! Coarse perimeter check applied before any datagram is decoded.

use std::collections::HashSet;
use std::net::IpAddr;

/// Hosts allowed to reach the control plane at all.
///
/// Loopback is always allowed. The bind host and any configured trusted hosts
/// are added on top. This is not authentication; the login handshake still
/// decides whether a sender is trusted.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    hosts: HashSet<String>,
}

impl AllowList {
    pub fn loopback_only() -> Self {
        Self::default()
    }

    pub fn new<I, S>(bind_host: &str, trusted_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut hosts: HashSet<String> = trusted_hosts.into_iter().map(Into::into).collect();
        let unspecified = bind_host
            .parse::<IpAddr>()
            .map(|ip| ip.is_unspecified())
            .unwrap_or(false);
        if !unspecified {
            hosts.insert(bind_host.to_string());
        }
        Self { hosts }
    }

    pub fn permits(&self, host: &str) -> bool {
        host == "localhost" || is_loopback(host) || self.hosts.contains(host)
    }
}

fn is_loopback(host: &str) -> bool {
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6
            .to_ipv4_mapped()
            .map_or(v6.is_loopback(), |v4| v4.is_loopback()),
        Err(_) => false,
    }
}

//! Client IP extraction behind reverse proxies
//!
//! `X-Forwarded-For` and `X-Real-IP` are honoured only when the direct peer
//! is listed in `TRUSTED_PROXIES` (comma-separated IPs or CIDR ranges;
//! defaults to loopback and private ranges). The forwarded chain is walked
//! right to left and the first untrusted hop is the client, so entries a
//! client prepends itself are ignored.

use actix_web::HttpRequest;
use std::env;
use std::net::IpAddr;

const DEFAULT_TRUSTED: &str = "127.0.0.1,::1,10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,fc00::/7";

/// Best-effort client IP, `"unknown"` when the peer address is unavailable
pub fn extract_ip(req: &HttpRequest) -> String {
    let peer = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let trusted = env::var("TRUSTED_PROXIES").unwrap_or_else(|_| DEFAULT_TRUSTED.to_string());
    if !is_trusted(&peer, &trusted) {
        return peer;
    }

    if let Some(chain) = header_str(req, "x-forwarded-for") {
        let client = chain
            .rsplit(',')
            .map(str::trim)
            .filter(|hop| hop.parse::<IpAddr>().is_ok())
            .find(|hop| !is_trusted(hop, &trusted));
        if let Some(client) = client {
            return client.to_string();
        }
    }

    if let Some(real_ip) = header_str(req, "x-real-ip") {
        let real_ip = real_ip.trim();
        if real_ip.parse::<IpAddr>().is_ok() {
            return real_ip.to_string();
        }
    }

    peer
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn is_trusted(ip: &str, trusted: &str) -> bool {
    let Ok(ip) = ip.parse::<IpAddr>() else {
        return false;
    };

    trusted.split(',').map(str::trim).any(|entry| match entry.split_once('/') {
        Some((net, prefix)) => match (net.parse::<IpAddr>(), prefix.parse::<u8>()) {
            (Ok(net), Ok(prefix)) => in_cidr(ip, net, prefix),
            _ => false,
        },
        None => entry.parse::<IpAddr>().map(|t| t == ip).unwrap_or(false),
    })
}

fn in_cidr(ip: IpAddr, net: IpAddr, prefix: u8) -> bool {
    match (ip, net) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix <= 32 => {
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            u32::from(ip) & mask == u32::from(net) & mask
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix <= 128 => {
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            u128::from(ip) & mask == u128::from(net) & mask
        }
        _ => false,
    }
}

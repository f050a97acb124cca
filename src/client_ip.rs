use hyper::HeaderMap;
use std::net::SocketAddr;

/// Best-guess client IP for a request.
///
/// The first non-empty forwarding header wins: its value is split on commas
/// and the first element is returned trimmed, with no validation that it is a
/// well-formed address. This trusts the header as-is, which is only sound
/// behind a reverse proxy that sanitizes it. Without such a header the host
/// part of `remote_addr` (expected `host:port`) is returned, or the raw
/// string when it does not parse. Never fails.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    header_names: &[String],
    remote_addr: &str,
) -> String {
    if let Some(ip) = forwarded_ip(headers, header_names) {
        return ip;
    }
    match remote_addr.parse::<SocketAddr>() {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => remote_addr.to_owned(),
    }
}

fn forwarded_ip(headers: &HeaderMap, header_names: &[String]) -> Option<String> {
    header_names
        .iter()
        .filter_map(|name| headers.get_all(name).iter().next())
        .next()
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_owned())
}

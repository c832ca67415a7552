use std::sync::LazyLock;

use actix_web::HttpRequest;
use log::{debug, trace};
use regex::Regex;

use crate::config::IpSource;

/// Get the client IP of the request from the configured source.
///
/// The value is returned as found. Whether it is a valid, trusted address is for the caller to decide, so a proxy that
/// sends junk is reported as such rather than silently replaced by the peer address.
/// * `RemoteAddr`: the peer address from the connection info.
/// * `XForwardedFor`: the first (client-most) entry of the `X-Forwarded-For` header.
/// * `Forwarded`: the `for=` parameter of the first element of the `Forwarded` header, without quotes, brackets or
///   port.
/// * `Header(name)`: the trimmed value of the named header.
pub fn get_remote_ip(req: &HttpRequest, source: &IpSource) -> Option<String> {
    let result = match source {
        IpSource::RemoteAddr => {
            let peer_addr = req.peer_addr().map(|a| a.ip().to_string());
            trace!("Using Peer address for remote address: {peer_addr:?}");
            peer_addr
        },
        IpSource::XForwardedFor => header_value(req, "X-Forwarded-For")
            .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty()),
        IpSource::Forwarded => header_value(req, "Forwarded").and_then(|v| forwarded_for(&v)),
        IpSource::Header(name) => header_value(req, name).map(|v| v.trim().to_string()).filter(|s| !s.is_empty()),
    };
    if !matches!(source, IpSource::RemoteAddr) {
        debug!("Using {source} for remote address: {result:?}");
    }
    result
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers().get(name).and_then(|v| v.to_str().ok()).map(String::from)
}

static FORWARDED_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)for=(?P<ip>"[^"]*"|[^;,]+)"#).expect("Invalid Forwarded regex"));

/// Extracts the client address from a `Forwarded` header value, e.g. `for="[2001:db8::1]:4711";proto=https`
fn forwarded_for(value: &str) -> Option<String> {
    let first = value.split(',').next()?;
    let raw = FORWARDED_FOR.captures(first)?.name("ip")?.as_str().trim().trim_matches('"');
    let ip = match raw.strip_prefix('[') {
        // [v6]:port
        Some(rest) => rest.split(']').next()?,
        // v4:port. A bare v6 address has more than one colon and is left alone.
        None if raw.matches(':').count() == 1 => raw.split(':').next()?,
        None => raw,
    };
    Some(ip.to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;

    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn forwarded_header_values() {
        assert_eq!(forwarded_for("for=192.0.2.60;proto=http;by=203.0.113.43").as_deref(), Some("192.0.2.60"));
        assert_eq!(forwarded_for(r#"For="[2001:db8:cafe::17]:4711""#).as_deref(), Some("2001:db8:cafe::17"));
        assert_eq!(forwarded_for("for=197.97.145.145:443, for=10.0.0.1").as_deref(), Some("197.97.145.145"));
        assert_eq!(forwarded_for("for=unknown").as_deref(), Some("unknown"));
        assert_eq!(forwarded_for("proto=https"), None);
    }

    #[test]
    fn remote_ip_sources() {
        let peer: SocketAddr = "10.1.1.1:5555".parse().unwrap();
        let req = TestRequest::default()
            .peer_addr(peer)
            .insert_header(("X-Forwarded-For", "197.97.145.145, 10.0.0.2"))
            .insert_header(("Forwarded", "for=41.74.179.194;proto=https"))
            .insert_header(("X-Real-IP", " 41.74.179.200 "))
            .to_http_request();
        assert_eq!(get_remote_ip(&req, &IpSource::RemoteAddr).as_deref(), Some("10.1.1.1"));
        assert_eq!(get_remote_ip(&req, &IpSource::XForwardedFor).as_deref(), Some("197.97.145.145"));
        assert_eq!(get_remote_ip(&req, &IpSource::Forwarded).as_deref(), Some("41.74.179.194"));
        assert_eq!(get_remote_ip(&req, &IpSource::Header("X-Real-IP".into())).as_deref(), Some("41.74.179.200"));
        assert_eq!(get_remote_ip(&req, &IpSource::Header("X-Client-IP".into())), None);
    }
}

use std::net::IpAddr;

/// Reduces a candidate client address to a bare IP literal
///
/// A valid IPv4 or IPv6 literal comes back unchanged. Otherwise a port suffix
/// is stripped from the `[IPv6]:port` and `IPv4:port` forms. Anything else,
/// including a bare IPv6 address with trailing garbage, yields `None`.
///
/// The part left after stripping a port isn't validated again, so
/// `not-an-ip:80` turns into `not-an-ip`, but an empty one, as in `:80`, is
/// rejected.
pub fn valid_ip(candidate: &str) -> Option<&str> {
    if candidate.parse::<IpAddr>().is_ok() {
        return Some(candidate);
    }

    let host = if let Some((host, _port)) = candidate.split_once(']') {
        host.trim_start_matches('[')
    } else if candidate.matches(':').count() == 1 {
        candidate.split_once(':').map_or("", |(host, _port)| host)
    } else {
        ""
    };
    Some(host).filter(|host| !host.is_empty())
}

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::IpNet;

const PRIVATE_BLOCKS: [&str; 8] = [
    // IPv4 loopback
    "127.0.0.0/8",
    // RFC1918
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    // RFC3927 link-local
    "169.254.0.0/16",
    // IPv6 loopback
    "::1/128",
    // IPv6 link-local
    "fe80::/10",
    // IPv6 unique local
    "fc00::/7",
];

/// Address blocks that are never sent to the geolocation provider
///
/// Built once at startup and only read afterwards, so a single instance can be
/// shared between all request handlers.
#[derive(Debug, Clone)]
pub struct PrivateRanges(Vec<IpNet>);

impl PrivateRanges {
    /// Loopback, RFC1918, link-local and IPv6 unique local blocks
    pub fn standard() -> Self {
        Self(
            PRIVATE_BLOCKS
                .iter()
                .filter_map(|cidr| cidr.parse().ok())
                .collect(),
        )
    }

    /// Tells whether `ip` is loopback, link-local or inside one of the blocks.
    ///
    /// IPv4-mapped IPv6 addresses are classified as the IPv4 address they map.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
            IpAddr::V4(_) => ip,
        };
        let direct = match ip {
            IpAddr::V4(v4) => is_special_v4(v4),
            IpAddr::V6(v6) => is_special_v6(v6),
        };
        direct || self.0.iter().any(|block| block.contains(&ip))
    }
}

fn is_special_v4(ip: Ipv4Addr) -> bool {
    // link-local multicast is 224.0.0.0/24
    ip.is_loopback() || ip.is_link_local() || ip.octets()[..3] == [224, 0, 0]
}

fn is_special_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback() || first & 0xffc0 == 0xfe80 || first & 0xff0f == 0xff02
}

#[cfg(test)]
mod tests {
    use super::PrivateRanges;
    use std::net::IpAddr;

    fn is_private(ip: &str) -> bool {
        PrivateRanges::standard().contains(ip.parse::<IpAddr>().unwrap())
    }

    #[test]
    fn table_is_complete() {
        assert_eq!(PrivateRanges::standard().0.len(), 8);
    }

    #[test]
    fn ipv4_private() {
        for ip in [
            "127.0.0.1",
            "127.255.255.254",
            "10.0.0.1",
            "10.255.255.255",
            "172.16.0.1",
            "172.31.255.255",
            "192.168.1.1",
            "169.254.10.20",
            "224.0.0.251",
        ] {
            assert!(is_private(ip), "{ip}");
        }
    }

    #[test]
    fn ipv6_private() {
        for ip in [
            "::1",
            "fe80::1",
            "febf::1",
            "fc00::1",
            "fd12:3456:789a::1",
            "ff02::1",
            "::ffff:127.0.0.1",
            "::ffff:192.168.0.1",
        ] {
            assert!(is_private(ip), "{ip}");
        }
    }

    #[test]
    fn public() {
        for ip in [
            "8.8.8.8",
            "8.8.2.8",
            "172.32.0.1",
            "192.169.0.1",
            "224.0.1.1",
            "2001:4860:4860::8888",
            "fec0::1",
            "ff05::1",
            "::ffff:8.8.8.8",
        ] {
            assert!(!is_private(ip), "{ip}");
        }
    }
}

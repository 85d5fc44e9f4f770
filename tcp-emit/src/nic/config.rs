use crate::wire::{Checksum, IpAddress, IpVersion, Ipv4Address, Ipv6Address};

/// The configuration of a device context.
///
/// All fields are public, the constructors choose the defaults of an Ethernet interface and the
/// builder methods override single values:
///
/// ```
/// use tcp_emit::nic::Config;
/// use tcp_emit::wire::{Checksum, Ipv4Address};
///
/// let config = Config::ipv4(Ipv4Address::new(10, 0, 0, 1))
///     .mtu(9000)
///     .checksum(Checksum::Ignored);
/// assert_eq!(config.link_header_len, 14);
/// assert_eq!(config.hop_limit, 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    /// The local address, used as the source of every segment.
    ///
    /// Its version also determines the IP version of the device.
    pub address: IpAddress,

    /// Maximum size of an IP packet, from the start of the IP header.
    pub mtu: usize,

    /// Octets reserved in front of the IP header for the link layer.
    pub link_header_len: usize,

    /// The advertised receive window.
    ///
    /// Defaults to the maximum segment size when `None`.
    pub recv_window: Option<u16>,

    /// Time to live or hop limit of outgoing packets.
    pub hop_limit: u8,

    /// Whether checksums are computed or left to the card.
    pub checksum: Checksum,
}

impl Config {
    /// The MTU of an Ethernet link.
    pub const DEFAULT_MTU: usize = 1500;

    /// The length of an Ethernet header without VLAN tags.
    pub const DEFAULT_LINK_HEADER_LEN: usize = 14;

    /// The default time to live, see [RFC 1700].
    ///
    /// [RFC 1700]: https://tools.ietf.org/html/rfc1700
    pub const DEFAULT_HOP_LIMIT: u8 = 64;

    /// Configure a device for the given local address.
    pub fn new(address: IpAddress) -> Self {
        Config {
            address,
            mtu: Self::DEFAULT_MTU,
            link_header_len: Self::DEFAULT_LINK_HEADER_LEN,
            recv_window: None,
            hop_limit: Self::DEFAULT_HOP_LIMIT,
            checksum: Checksum::Manual,
        }
    }

    /// Configure an IPv4 device.
    pub fn ipv4(address: Ipv4Address) -> Self {
        Config::new(address.into())
    }

    /// Configure an IPv6 device.
    pub fn ipv6(address: Ipv6Address) -> Self {
        Config::new(address.into())
    }

    /// Override the MTU.
    pub fn mtu(self, mtu: usize) -> Self {
        Config { mtu, ..self }
    }

    /// Override the space reserved for the link layer header.
    pub fn link_header_len(self, link_header_len: usize) -> Self {
        Config { link_header_len, ..self }
    }

    /// Advertise a fixed receive window instead of the maximum segment size.
    pub fn recv_window(self, window: u16) -> Self {
        Config { recv_window: Some(window), ..self }
    }

    /// Override the time to live or hop limit.
    pub fn hop_limit(self, hop_limit: u8) -> Self {
        Config { hop_limit, ..self }
    }

    /// Choose between computing checksums and offloading them to the card.
    pub fn checksum(self, checksum: Checksum) -> Self {
        Config { checksum, ..self }
    }

    /// The IP version of the configured address.
    pub fn version(&self) -> IpVersion {
        self.address.version()
    }
}

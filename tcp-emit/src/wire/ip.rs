use core::fmt;
use core::convert::From;

use super::{ipv4, ipv6};
use super::{Ipv4Address, Ipv6Address};

/// Internet protocol version.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Version {
    Ipv4,
    Ipv6,
}

impl Version {
    /// The number stored in the version nibble of the header.
    pub fn number(self) -> u8 {
        match self {
            Version::Ipv4 => 4,
            Version::Ipv6 => 6,
        }
    }

    /// Length of the fixed header, in octets.
    ///
    /// Outbound segments never carry IPv4 options or IPv6 extension headers, so this is also the
    /// offset at which the TCP header starts.
    pub fn header_len(self) -> usize {
        match self {
            Version::Ipv4 => ipv4::HEADER_LEN,
            Version::Ipv6 => ipv6::HEADER_LEN,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Version::Ipv4 => write!(f, "IPv4"),
            Version::Ipv6 => write!(f, "IPv6"),
        }
    }
}

enum_with_unknown! {
    /// IP datagram encapsulated protocol.
    pub enum Protocol(u8) {
        /// Internet control messages.
        Icmp      = 0x01,
        /// The transmission control protocol.
        Tcp       = 0x06,
        /// The user datagram protocol.
        Udp       = 0x11,
        /// Internet control messages for IPv6.
        Icmpv6    = 0x3a,
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Protocol::Icmp        => write!(f, "ICMP"),
            Protocol::Tcp         => write!(f, "TCP"),
            Protocol::Udp         => write!(f, "UDP"),
            Protocol::Icmpv6      => write!(f, "ICMPv6"),
            Protocol::Unknown(id) => write!(f, "0x{:02x}", id)
        }
    }
}

/// An internetworking address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Address {
    /// An IPv4 address.
    Ipv4(Ipv4Address),

    /// An IPv6 address.
    Ipv6(Ipv6Address),
}

impl Address {
    /// Create an address wrapping an IPv4 address with the given octets.
    pub const fn v4(a0: u8, a1: u8, a2: u8, a3: u8) -> Address {
        Address::Ipv4(Ipv4Address::new(a0, a1, a2, a3))
    }

    /// Create an address wrapping an IPv6 address with the given words.
    pub fn v6(
        a0: u16, a1: u16, a2: u16, a3: u16,
        a4: u16, a5: u16, a6: u16, a7: u16,
    ) -> Address {
        Address::Ipv6(Ipv6Address::new(a0, a1, a2, a3, a4, a5, a6, a7))
    }

    /// The IP version this address belongs to.
    pub fn version(&self) -> Version {
        match self {
            Address::Ipv4(_) => Version::Ipv4,
            Address::Ipv6(_) => Version::Ipv6,
        }
    }

    /// Return an address as a sequence of octets, in big-endian.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Address::Ipv4(addr) => addr.as_bytes(),
            Address::Ipv6(addr) => addr.as_bytes(),
        }
    }

    /// Query whether the address is the unspecified address of its family.
    pub fn is_unspecified(&self) -> bool {
        match self {
            Address::Ipv4(addr) => addr.is_unspecified(),
            Address::Ipv6(addr) => addr.is_unspecified(),
        }
    }
}

impl From<Ipv4Address> for Address {
    fn from(addr: Ipv4Address) -> Self {
        Address::Ipv4(addr)
    }
}

impl From<Ipv6Address> for Address {
    fn from(addr: Ipv6Address) -> Self {
        Address::Ipv6(addr)
    }
}

#[cfg(feature = "std")]
impl From<::std::net::IpAddr> for Address {
    fn from(x: ::std::net::IpAddr) -> Address {
        match x {
            ::std::net::IpAddr::V4(ipv4) => Address::Ipv4(ipv4.into()),
            ::std::net::IpAddr::V6(ipv6) => Address::Ipv6(ipv6.into()),
        }
    }
}

#[cfg(feature = "std")]
impl From<Address> for ::std::net::IpAddr {
    fn from(x: Address) -> ::std::net::IpAddr {
        match x {
            Address::Ipv4(ipv4) => ::std::net::IpAddr::V4(ipv4.into()),
            Address::Ipv6(ipv6) => ::std::net::IpAddr::V6(ipv6.into()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Address::Ipv4(addr) => write!(f, "{}", addr),
            Address::Ipv6(addr) => write!(f, "{}", addr),
        }
    }
}

pub mod checksum {
    //! The RFC 1071 internet checksum.
    //!
    //! All functions return the one's complement sum *without* the final complement. Callers
    //! store `!sum` into a checksum field, and a buffer including a correct checksum sums to
    //! `0xffff`.
    use byteorder::{ByteOrder, NetworkEndian};

    use super::*;

    fn propagate_carries(word: u32) -> u16 {
        let sum = (word >> 16) + (word & 0xffff);
        ((sum >> 16) as u16) + (sum as u16)
    }

    /// Compute an RFC 1071 compliant checksum (without the final complement).
    pub fn data(mut data: &[u8]) -> u16 {
        let mut accum = 0;

        // For each 32-byte chunk...
        const CHUNK_SIZE: usize = 32;
        while data.len() >= CHUNK_SIZE {
            let mut d = &data[..CHUNK_SIZE];
            // ... take by 2 bytes and sum them.
            while d.len() >= 2 {
                accum += NetworkEndian::read_u16(d) as u32;
                d = &d[2..];
            }

            data = &data[CHUNK_SIZE..];
        }

        // Sum the rest that does not fit the last 32-byte chunk,
        // taking by 2 bytes.
        while data.len() >= 2 {
            accum += NetworkEndian::read_u16(data) as u32;
            data = &data[2..];
        }

        // Add the last remaining odd byte, if any.
        if let Some(&value) = data.first() {
            accum += (value as u32) << 8;
        }

        propagate_carries(accum)
    }

    /// Combine several RFC 1071 compliant checksums.
    pub fn combine(checksums: &[u16]) -> u16 {
        let mut accum: u32 = 0;
        for &word in checksums {
            accum += word as u32;
        }
        propagate_carries(accum)
    }

    /// Compute an IP pseudo header checksum.
    ///
    /// The `length` is the length of the upper layer packet, i.e. the TCP header, options and
    /// data.
    ///
    /// # Panics
    /// This function panics unless `src_addr` and `dst_addr` belong to the same family.
    pub fn pseudo_header(src_addr: &Address, dst_addr: &Address,
                         protocol: Protocol, length: u32) -> u16 {
        match (src_addr, dst_addr) {
            (Address::Ipv4(src_addr), Address::Ipv4(dst_addr)) => {
                let mut proto_len = [0u8; 4];
                proto_len[1] = protocol.into();
                NetworkEndian::write_u16(&mut proto_len[2..4], length as u16);

                combine(&[
                    data(src_addr.as_bytes()),
                    data(dst_addr.as_bytes()),
                    data(&proto_len[..])
                ])
            },

            (Address::Ipv6(src_addr), Address::Ipv6(dst_addr)) => {
                let mut proto_len = [0u8; 8];
                proto_len[7] = protocol.into();
                NetworkEndian::write_u32(&mut proto_len[0..4], length);
                combine(&[
                    data(src_addr.as_bytes()),
                    data(dst_addr.as_bytes()),
                    data(&proto_len[..])
                ])
            }

            _ => panic!("Unexpected pseudo header addresses: {}, {}",
                        src_addr, dst_addr)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rfc1071_example() {
        // The worked example of RFC 1071, section 3.
        let bytes = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(checksum::data(&bytes), 0xddf2);
        assert_eq!(checksum::combine(&[
            checksum::data(&bytes[..4]),
            checksum::data(&bytes[4..]),
        ]), 0xddf2);
    }

    #[test]
    fn odd_trailing_byte() {
        assert_eq!(checksum::data(&[0x12, 0x34, 0x56]), 0x6834);
    }

    #[test]
    fn end_around_carry() {
        assert_eq!(checksum::combine(&[0xffff, 0x0001]), 0x0001);
        assert_eq!(checksum::data(&[0xff; 64]), 0xffff);
    }

    #[test]
    #[should_panic]
    fn mixed_pseudo_header() {
        checksum::pseudo_header(
            &Address::v4(10, 0, 0, 1),
            &Address::Ipv6(Ipv6Address::LOOPBACK),
            Protocol::Tcp, 20);
    }
}

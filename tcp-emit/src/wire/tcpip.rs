//! The combined IP and TCP header of a single segment.
//!
//! Outbound segments of this crate never carry IPv4 options or IPv6 extension headers. The TCP
//! header hence starts at a fixed offset that only depends on the IP version, and both headers can
//! be accessed through one view without re-parsing the IP header for every field.
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};
use super::ip::{checksum, Address, Protocol, Version};
use super::{ipv4, ipv6, tcp};
use super::{Ipv4Address, Ipv6Address};
use super::tcp::{Flags, SeqNumber};

/// A read/write wrapper around the IP and TCP headers of a segment buffer.
///
/// The buffer starts with the IP header, i.e. any link layer header has been stripped. Field
/// accessors for the fixed headers never panic once the packet has been constructed with
/// [`new_checked`]. The accessors specific to one IP version panic when called on a view of the
/// other version, as noted in their documentation.
///
/// [`new_checked`]: #method.new_checked
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T> {
    buffer: T,
    version: Version,
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Imbue a raw octet buffer with an IP and TCP header structure.
    pub fn new_unchecked(buffer: T, version: Version) -> Packet<T> {
        Packet { buffer, version }
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(buffer: T, version: Version) -> Result<Packet<T>> {
        let packet = Self::new_unchecked(buffer, version);
        packet.check_len()?;
        Ok(packet)
    }

    /// Validate that the buffer holds a TCP segment as received from a peer.
    ///
    /// Stricter than [`new_checked`], the fields themselves are inspected:
    ///
    /// * `Err(Error::Unrecognized)` if the version nibble differs from `version` or the IP packet
    ///   does not encapsulate TCP.
    /// * `Err(Error::Unsupported)` if an IPv4 header carries options.
    /// * `Err(Error::Malformed)` if the TCP data offset is smaller than the fixed header.
    /// * `Err(Error::Truncated)` if the buffer is too short for any of the headers.
    ///
    /// [`new_checked`]: #method.new_checked
    pub fn new_inbound(buffer: T, version: Version) -> Result<Packet<T>> {
        let packet = Self::new_checked(buffer, version)?;
        if packet.ip_version() != version.number() {
            return Err(Error::Unrecognized);
        }
        if packet.protocol() != Protocol::Tcp {
            return Err(Error::Unrecognized);
        }
        if version == Version::Ipv4 {
            let ihl = packet.ip()[ipv4::field::VER_IHL] & 0x0f;
            if usize::from(ihl) * 4 != ipv4::HEADER_LEN {
                return Err(Error::Unsupported);
            }
        }
        packet.options()?;
        Ok(packet)
    }

    /// Ensure that no accessor of the fixed headers will panic if called.
    ///
    /// Returns `Err(Error::Truncated)` if the buffer is shorter than the IP header followed by the
    /// TCP header without options.
    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < self.version.header_len() + tcp::HEADER_LEN {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Consume the packet, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// The IP version this view interprets the buffer as.
    pub fn version(&self) -> Version {
        self.version
    }

    /// View the packet as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    fn ip(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    fn tcp(&self) -> &[u8] {
        &self.buffer.as_ref()[self.version.header_len()..]
    }

    /// Return the version nibble of the IP header.
    #[inline]
    pub fn ip_version(&self) -> u8 {
        self.ip()[0] >> 4
    }

    /// Return the traffic class (IPv6) or type of service octet (IPv4).
    pub fn traffic_class(&self) -> u8 {
        let ip = self.ip();
        match self.version {
            Version::Ipv4 => ip[ipv4::field::DSCP_ECN],
            Version::Ipv6 => (ip[0] << 4) | (ip[1] >> 4),
        }
    }

    /// Return the IPv6 flow label.
    ///
    /// # Panics
    /// This function panics on an IPv4 packet.
    pub fn flow_label(&self) -> u32 {
        self.expect_version(Version::Ipv6);
        NetworkEndian::read_u32(&self.ip()[ipv6::field::VER_TC_FLOW]) & 0x000f_ffff
    }

    /// Return the length field of the IP header.
    ///
    /// This is the total length for IPv4 but the length *after* the fixed header for IPv6.
    #[inline]
    pub fn ip_len(&self) -> u16 {
        let field = match self.version {
            Version::Ipv4 => ipv4::field::LENGTH,
            Version::Ipv6 => ipv6::field::LENGTH,
        };
        NetworkEndian::read_u16(&self.ip()[field])
    }

    /// Return the IPv4 fragment identification field.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet.
    #[inline]
    pub fn ident(&self) -> u16 {
        self.expect_version(Version::Ipv4);
        NetworkEndian::read_u16(&self.ip()[ipv4::field::IDENT])
    }

    /// Return the IPv4 flags and fragment offset field, unshifted.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet.
    #[inline]
    pub fn frag_field(&self) -> u16 {
        self.expect_version(Version::Ipv4);
        NetworkEndian::read_u16(&self.ip()[ipv4::field::FLG_OFF])
    }

    /// Return the time to live (IPv4) or hop limit (IPv6) field.
    #[inline]
    pub fn hop_limit(&self) -> u8 {
        match self.version {
            Version::Ipv4 => self.ip()[ipv4::field::TTL],
            Version::Ipv6 => self.ip()[ipv6::field::HOP_LIMIT],
        }
    }

    /// Return the protocol (IPv4) or next header (IPv6) field.
    #[inline]
    pub fn protocol(&self) -> Protocol {
        match self.version {
            Version::Ipv4 => Protocol::from(self.ip()[ipv4::field::PROTOCOL]),
            Version::Ipv6 => Protocol::from(self.ip()[ipv6::field::NXT_HDR]),
        }
    }

    /// Return the IPv4 header checksum field.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet, which has no header checksum.
    #[inline]
    pub fn ip_checksum(&self) -> u16 {
        self.expect_version(Version::Ipv4);
        NetworkEndian::read_u16(&self.ip()[ipv4::field::CHECKSUM])
    }

    /// Return the source address field.
    #[inline]
    pub fn src_addr(&self) -> Address {
        match self.version {
            Version::Ipv4 => Ipv4Address::from_bytes(&self.ip()[ipv4::field::SRC_ADDR]).into(),
            Version::Ipv6 => Ipv6Address::from_bytes(&self.ip()[ipv6::field::SRC_ADDR]).into(),
        }
    }

    /// Return the destination address field.
    #[inline]
    pub fn dst_addr(&self) -> Address {
        match self.version {
            Version::Ipv4 => Ipv4Address::from_bytes(&self.ip()[ipv4::field::DST_ADDR]).into(),
            Version::Ipv6 => Ipv6Address::from_bytes(&self.ip()[ipv6::field::DST_ADDR]).into(),
        }
    }

    /// Return the source port field.
    #[inline]
    pub fn src_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.tcp()[tcp::field::SRC_PORT])
    }

    /// Return the destination port field.
    #[inline]
    pub fn dst_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.tcp()[tcp::field::DST_PORT])
    }

    /// Return the sequence number field.
    #[inline]
    pub fn seq_number(&self) -> SeqNumber {
        SeqNumber(NetworkEndian::read_i32(&self.tcp()[tcp::field::SEQ_NUM]))
    }

    /// Return the acknowledgement number field.
    #[inline]
    pub fn ack_number(&self) -> SeqNumber {
        SeqNumber(NetworkEndian::read_i32(&self.tcp()[tcp::field::ACK_NUM]))
    }

    /// Return the TCP header length, in octets.
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(self.tcp()[tcp::field::OFFSET] >> 4) * 4
    }

    /// Read all flags at once.
    #[inline]
    pub fn flags(&self) -> Flags {
        Flags(self.tcp()[tcp::field::FLAGS])
    }

    /// Return the window size field.
    #[inline]
    pub fn window_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.tcp()[tcp::field::WIN_SIZE])
    }

    /// Return the TCP checksum field.
    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.tcp()[tcp::field::CHECKSUM])
    }

    /// Return the urgent pointer field.
    #[inline]
    pub fn urgent_at(&self) -> u16 {
        NetworkEndian::read_u16(&self.tcp()[tcp::field::URGENT])
    }

    /// Return the options region as indicated by the data offset.
    ///
    /// Returns `Err(Error::Malformed)` if the data offset is smaller than the fixed header and
    /// `Err(Error::Truncated)` if it points beyond the buffer.
    pub fn options(&self) -> Result<&[u8]> {
        let header_len = self.header_len();
        if header_len < tcp::HEADER_LEN {
            return Err(Error::Malformed);
        }
        self.tcp().get(tcp::field::OPTIONS(header_len)).ok_or(Error::Truncated)
    }

    /// Validate the IPv4 header checksum.
    ///
    /// Always `true` for IPv6 which has no header checksum.
    pub fn verify_ip_checksum(&self) -> bool {
        match self.version {
            Version::Ipv4 => checksum::data(&self.ip()[..ipv4::HEADER_LEN]) == !0,
            Version::Ipv6 => true,
        }
    }

    /// Validate the TCP checksum of a segment that is `len` octets long, counted from the start of
    /// the IP header.
    ///
    /// # Panics
    /// This function panics if `len` is shorter than the headers or longer than the buffer.
    pub fn verify_checksum(&self, len: usize) -> bool {
        self.tcp_checksum(len) == !0
    }

    fn tcp_checksum(&self, len: usize) -> u16 {
        let segment = &self.ip()[self.version.header_len()..len];
        checksum::combine(&[
            checksum::pseudo_header(&self.src_addr(), &self.dst_addr(), Protocol::Tcp,
                                    segment.len() as u32),
            checksum::data(segment),
        ])
    }

    fn expect_version(&self, version: Version) {
        assert_eq!(self.version, version, "field does not exist in {} header", self.version);
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// View the packet as a mutable raw byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }

    fn ip_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }

    fn tcp_mut(&mut self) -> &mut [u8] {
        let offset = self.version.header_len();
        &mut self.buffer.as_mut()[offset..]
    }

    /// Set the version nibble of the IP header.
    #[inline]
    pub fn set_ip_version(&mut self, value: u8) {
        let ip = self.ip_mut();
        ip[0] = (ip[0] & !0xf0) | (value << 4);
    }

    /// Set the IPv4 header length, in octets.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet.
    #[inline]
    pub fn set_ipv4_header_len(&mut self, value: u8) {
        self.expect_version(Version::Ipv4);
        let ip = self.ip_mut();
        ip[ipv4::field::VER_IHL] = (ip[ipv4::field::VER_IHL] & !0x0f) | ((value / 4) & 0x0f);
    }

    /// Set the traffic class (IPv6) or type of service octet (IPv4).
    pub fn set_traffic_class(&mut self, value: u8) {
        match self.version {
            Version::Ipv4 => self.ip_mut()[ipv4::field::DSCP_ECN] = value,
            Version::Ipv6 => {
                let ip = self.ip_mut();
                ip[0] = (ip[0] & 0xf0) | (value >> 4);
                ip[1] = (ip[1] & 0x0f) | (value << 4);
            }
        }
    }

    /// Set the IPv6 flow label.
    ///
    /// # Panics
    /// This function panics on an IPv4 packet.
    pub fn set_flow_label(&mut self, value: u32) {
        self.expect_version(Version::Ipv6);
        let field = &mut self.ip_mut()[ipv6::field::VER_TC_FLOW];
        let raw = NetworkEndian::read_u32(field);
        let raw = (raw & 0xfff0_0000) | (value & 0x000f_ffff);
        NetworkEndian::write_u32(field, raw)
    }

    /// Set the length field of the IP header.
    ///
    /// For IPv6 the caller subtracts the fixed header, see [`ip_len`].
    ///
    /// [`ip_len`]: #method.ip_len
    #[inline]
    pub fn set_ip_len(&mut self, value: u16) {
        let field = match self.version {
            Version::Ipv4 => ipv4::field::LENGTH,
            Version::Ipv6 => ipv6::field::LENGTH,
        };
        NetworkEndian::write_u16(&mut self.ip_mut()[field], value)
    }

    /// Set the IPv4 fragment identification field.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet.
    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        self.expect_version(Version::Ipv4);
        NetworkEndian::write_u16(&mut self.ip_mut()[ipv4::field::IDENT], value)
    }

    /// Set the IPv4 flags and fragment offset field, unshifted.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet.
    #[inline]
    pub fn set_frag_field(&mut self, value: u16) {
        self.expect_version(Version::Ipv4);
        NetworkEndian::write_u16(&mut self.ip_mut()[ipv4::field::FLG_OFF], value)
    }

    /// Set the time to live (IPv4) or hop limit (IPv6) field.
    #[inline]
    pub fn set_hop_limit(&mut self, value: u8) {
        match self.version {
            Version::Ipv4 => self.ip_mut()[ipv4::field::TTL] = value,
            Version::Ipv6 => self.ip_mut()[ipv6::field::HOP_LIMIT] = value,
        }
    }

    /// Set the protocol (IPv4) or next header (IPv6) field.
    #[inline]
    pub fn set_protocol(&mut self, value: Protocol) {
        match self.version {
            Version::Ipv4 => self.ip_mut()[ipv4::field::PROTOCOL] = value.into(),
            Version::Ipv6 => self.ip_mut()[ipv6::field::NXT_HDR] = value.into(),
        }
    }

    /// Set the IPv4 header checksum field.
    ///
    /// # Panics
    /// This function panics on an IPv6 packet.
    #[inline]
    pub fn set_ip_checksum(&mut self, value: u16) {
        self.expect_version(Version::Ipv4);
        NetworkEndian::write_u16(&mut self.ip_mut()[ipv4::field::CHECKSUM], value)
    }

    /// Set the source address field.
    ///
    /// # Panics
    /// This function panics if the address belongs to the other IP version.
    #[inline]
    pub fn set_src_addr(&mut self, value: Address) {
        let field = match self.version {
            Version::Ipv4 => ipv4::field::SRC_ADDR,
            Version::Ipv6 => ipv6::field::SRC_ADDR,
        };
        self.write_addr(field, value)
    }

    /// Set the destination address field.
    ///
    /// # Panics
    /// This function panics if the address belongs to the other IP version.
    #[inline]
    pub fn set_dst_addr(&mut self, value: Address) {
        let field = match self.version {
            Version::Ipv4 => ipv4::field::DST_ADDR,
            Version::Ipv6 => ipv6::field::DST_ADDR,
        };
        self.write_addr(field, value)
    }

    fn write_addr(&mut self, field: core::ops::Range<usize>, value: Address) {
        assert_eq!(value.version(), self.version,
            "address {} does not fit an {} header", value, self.version);
        self.ip_mut()[field].copy_from_slice(value.as_bytes())
    }

    /// Set the source port field.
    #[inline]
    pub fn set_src_port(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.tcp_mut()[tcp::field::SRC_PORT], value)
    }

    /// Set the destination port field.
    #[inline]
    pub fn set_dst_port(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.tcp_mut()[tcp::field::DST_PORT], value)
    }

    /// Set the sequence number field.
    #[inline]
    pub fn set_seq_number(&mut self, value: SeqNumber) {
        NetworkEndian::write_i32(&mut self.tcp_mut()[tcp::field::SEQ_NUM], value.0)
    }

    /// Set the acknowledgement number field.
    #[inline]
    pub fn set_ack_number(&mut self, value: SeqNumber) {
        NetworkEndian::write_i32(&mut self.tcp_mut()[tcp::field::ACK_NUM], value.0)
    }

    /// Set the TCP header length, in octets.
    ///
    /// This overwrites the whole data offset octet, clearing the reserved bits and the NS flag.
    #[inline]
    pub fn set_header_len(&mut self, value: usize) {
        self.tcp_mut()[tcp::field::OFFSET] = tcp::data_offset(value)
    }

    /// Set all flags at once.
    #[inline]
    pub fn set_flags(&mut self, value: Flags) {
        self.tcp_mut()[tcp::field::FLAGS] = value.0
    }

    /// Set the window size field.
    #[inline]
    pub fn set_window_len(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.tcp_mut()[tcp::field::WIN_SIZE], value)
    }

    /// Set the TCP checksum field.
    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.tcp_mut()[tcp::field::CHECKSUM], value)
    }

    /// Set the urgent pointer field.
    #[inline]
    pub fn set_urgent_at(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.tcp_mut()[tcp::field::URGENT], value)
    }

    /// Return the options region as indicated by the data offset, mutably.
    ///
    /// Fails under the same conditions as [`options`].
    ///
    /// [`options`]: #method.options
    pub fn options_mut(&mut self) -> Result<&mut [u8]> {
        let header_len = self.header_len();
        if header_len < tcp::HEADER_LEN {
            return Err(Error::Malformed);
        }
        self.tcp_mut().get_mut(tcp::field::OPTIONS(header_len)).ok_or(Error::Truncated)
    }

    /// Compute and fill in the IPv4 header checksum.
    ///
    /// Does nothing for IPv6. All other header fields must have their final value.
    pub fn fill_ip_checksum(&mut self) {
        if self.version != Version::Ipv4 {
            return;
        }
        self.set_ip_checksum(0);
        let checksum = !checksum::data(&self.ip()[..ipv4::HEADER_LEN]);
        self.set_ip_checksum(checksum)
    }

    /// Compute and fill in the TCP checksum of a segment that is `len` octets long, counted from
    /// the start of the IP header.
    ///
    /// The addresses of the pseudo header are read from the IP header, which must be filled in
    /// already.
    ///
    /// # Panics
    /// This function panics if `len` is shorter than the headers or longer than the buffer.
    pub fn fill_checksum(&mut self, len: usize) {
        self.set_checksum(0);
        let checksum = !self.tcp_checksum(len);
        self.set_checksum(checksum)
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

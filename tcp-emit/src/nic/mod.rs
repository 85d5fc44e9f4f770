//! Encapsulates the output side of a network interface card.
//!
//! A [`Device`] owns one output buffer together with everything the tcp layer needs to know about
//! the interface: its local address, the MTU and the maximum segment size derived from it, the
//! advertised receive window and the checksum capabilities. It also owns the per-device state
//! that changes with every packet, the IPv4 identification counter and the send statistics.
//!
//! [`Device`]: struct.Device.html
pub mod common;
mod config;
mod exclusive;

use crate::layer::{Error, Result};
use crate::wire::{Checksum, IpAddress, IpVersion, TcpIpPacket, TcpOption, TCP_HEADER_LEN};

pub use self::common::{Counters, Ident, Statistics};
pub use self::config::Config;
pub use self::exclusive::Exclusive;

/// A device context with its output buffer.
///
/// The buffer starts with `link_header_len` octets reserved for the link layer, followed by room
/// for an IP packet of up to `mtu` octets. The length of the packet currently in the buffer is
/// counted from the start of its IP header.
#[derive(Debug)]
pub struct Device<B, S = ()> {
    buffer: B,
    len: usize,
    config: Config,
    mss: u16,
    recv_window: u16,
    ident: Ident,
    stats: S,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Device<B> {
    /// Create a device context that discards statistics.
    ///
    /// Returns `Err(Error::BadSize)` if the buffer can not hold the link header and a full MTU. An
    /// MTU that leaves no room for the headers and the maximum segment size option, or one that
    /// does not fit the IP length fields, and an unspecified local address are
    /// `Err(Error::Illegal)`.
    pub fn new(buffer: B, config: Config) -> Result<Self> {
        Device::with_statistics(buffer, config, ())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, S: Statistics> Device<B, S> {
    /// Create a device context counting into `stats`.
    ///
    /// Fails under the same conditions as [`new`].
    ///
    /// [`new`]: #method.new
    pub fn with_statistics(buffer: B, config: Config, stats: S) -> Result<Self> {
        if config.address.is_unspecified() {
            return Err(Error::Illegal);
        }

        let headers = config.version().header_len() + TCP_HEADER_LEN;
        if config.mtu > usize::from(u16::max_value())
            || config.mtu < headers + TcpOption::MSS_LEN
        {
            return Err(Error::Illegal);
        }

        let capacity = config.link_header_len.checked_add(config.mtu)
            .ok_or(Error::BadSize)?;
        if buffer.as_ref().len() < capacity {
            return Err(Error::BadSize);
        }

        let mss = (config.mtu - headers) as u16;
        Ok(Device {
            buffer,
            len: 0,
            recv_window: config.recv_window.unwrap_or(mss),
            config,
            mss,
            ident: Ident::default(),
            stats,
        })
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, S> Device<B, S> {
    /// Length of the current packet, from the start of the IP header.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Set the length of the current packet.
    ///
    /// # Panics
    /// This function panics if `len` is shorter than the IP and TCP header or longer than the
    /// MTU.
    pub fn set_len(&mut self, len: usize) {
        let headers = self.version().header_len() + TCP_HEADER_LEN;
        assert!(headers <= len && len <= self.config.mtu,
            "segment length {} outside of [{}, {}]", len, headers, self.config.mtu);
        self.len = len;
    }

    /// The configuration the device was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The local address.
    pub fn address(&self) -> IpAddress {
        self.config.address
    }

    /// The IP version of all packets of this device.
    pub fn version(&self) -> IpVersion {
        self.config.version()
    }

    /// The maximum transmission unit, counted from the start of the IP header.
    pub fn mtu(&self) -> usize {
        self.config.mtu
    }

    /// The maximum segment size, the MTU without the fixed IP and TCP headers.
    pub fn mss(&self) -> u16 {
        self.mss
    }

    /// The window advertised to peers that are not stopped.
    pub fn recv_window(&self) -> u16 {
        self.recv_window
    }

    /// Change the advertised receive window.
    pub fn set_recv_window(&mut self, window: u16) {
        self.recv_window = window;
    }

    /// Time to live or hop limit of outgoing packets.
    pub fn hop_limit(&self) -> u8 {
        self.config.hop_limit
    }

    /// Whether checksums are computed or left to the card.
    pub fn checksum(&self) -> Checksum {
        self.config.checksum
    }

    /// The identification the next IPv4 packet will get.
    pub fn ident(&self) -> u16 {
        self.ident.peek()
    }

    /// Restart the identification counter at `ident`.
    pub fn set_ident(&mut self, ident: u16) {
        self.ident = Ident::new(ident);
    }

    pub(crate) fn next_ident(&mut self) -> u16 {
        self.ident.next()
    }

    /// The statistics sink.
    pub fn statistics(&self) -> &S {
        &self.stats
    }

    /// The statistics sink, mutably.
    pub fn statistics_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    /// View the IP packet area of the buffer.
    pub fn packet(&self) -> TcpIpPacket<&[u8]> {
        let area = self.config.link_header_len..self.config.link_header_len + self.config.mtu;
        TcpIpPacket::new_unchecked(&self.buffer.as_ref()[area], self.version())
    }

    /// View the IP packet area of the buffer, mutably.
    pub fn packet_mut(&mut self) -> TcpIpPacket<&mut [u8]> {
        let area = self.config.link_header_len..self.config.link_header_len + self.config.mtu;
        let version = self.version();
        TcpIpPacket::new_unchecked(&mut self.buffer.as_mut()[area], version)
    }

    /// The payload area after a TCP header without options, up to the MTU.
    ///
    /// Data to be sent with [`tcp::data`] is written here first.
    ///
    /// [`tcp::data`]: ../layer/tcp/fn.data.html
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.config.link_header_len + self.version().header_len() + TCP_HEADER_LEN;
        let end = self.config.link_header_len + self.config.mtu;
        &mut self.buffer.as_mut()[start..end]
    }

    /// The whole frame, including the space reserved for the link layer, up to the current length.
    pub fn frame(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.config.link_header_len + self.len]
    }

    /// The whole frame, mutably.
    ///
    /// The link layer header is filled in here before the frame is handed to the driver.
    pub fn frame_mut(&mut self) -> &mut [u8] {
        let end = self.config.link_header_len + self.len;
        &mut self.buffer.as_mut()[..end]
    }

    /// Unwrap the buffer.
    pub fn into_inner(self) -> B {
        self.buffer
    }
}

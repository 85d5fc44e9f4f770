/*! Low-level packet access and construction.

# An overview over packet representations

The `wire` module deals with the octets of a segment. Every outbound segment handled by this crate
consists of a fixed IP header (IPv4 without options, or IPv6 without extension headers) that is
directly followed by a TCP header. The module provides:

 * Address, protocol and flag types with conversions to and from their wire encoding, e.g.
   [`Ipv4Address`], [`IpProtocol`] or [`TcpFlags`].
 * A view of a buffer as the combined IP and TCP header, [`TcpIpPacket`], with a getter and a
   setter for each field. The offset of the TCP header is memoized by the IP version of the view.
 * The RFC 1071 internet checksum, in the [`checksum`] module.

[`Ipv4Address`]: struct.Ipv4Address.html
[`IpProtocol`]: enum.IpProtocol.html
[`TcpFlags`]: struct.TcpFlags.html
[`TcpIpPacket`]: struct.TcpIpPacket.html
[`checksum`]: checksum/index.html

The `TcpIpPacket::new_checked` constructor guarantees that, if it returned `Ok(_)`, no accessor or
setter of the fixed headers will panic. Accessors that exist in only one IP version are the
exception, calling them on a view of the other version is a programming error and panics.

When parsing untrusted input, it is *necessary* to use `TcpIpPacket::new_inbound`; it additionally
validates the fields that determine the layout. When emitting output the buffer is usually filled
with a previous packet and only the length check of `new_checked` is meaningful.

# Examples

To emit the headers of a segment into an octet buffer, and then parse it back:

```rust
use tcp_emit::wire::*;
let mut buffer = vec![0; 40];
{ // emission
    let mut packet = TcpIpPacket::new_checked(&mut buffer[..], IpVersion::Ipv4)
        .expect("buffer too short");
    packet.set_ip_version(4);
    packet.set_ipv4_header_len(20);
    packet.set_ip_len(40);
    packet.set_hop_limit(64);
    packet.set_protocol(IpProtocol::Tcp);
    packet.set_src_addr(Ipv4Address::new(10, 0, 0, 1).into());
    packet.set_dst_addr(Ipv4Address::new(10, 0, 0, 2).into());
    packet.set_src_port(4096);
    packet.set_dst_port(80);
    packet.set_header_len(20);
    packet.set_flags(TcpFlags::SYN);
    packet.fill_checksum(40);
    packet.fill_ip_checksum();
}
{ // parsing
    let packet = TcpIpPacket::new_inbound(&buffer[..], IpVersion::Ipv4)
        .expect("malformed packet");
    assert!(packet.verify_ip_checksum());
    assert!(packet.verify_checksum(40));
    assert_eq!(packet.dst_port(), 80);
}
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `error.rs`
// * `ip.rs`
// * `ipv4.rs`
// * `ipv6.rs`
// * `mod.rs` (this file)
// * `tcp.rs`

// FIXME: Most fields should be self-explanatory and there is the general guide but enable once the
// other issues have been resolved.
#![allow(missing_docs)]

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
}

mod error;
mod ip;
mod ipv4;
mod ipv6;
mod tcp;
mod tcpip;

/// Describes how to handle checksums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checksum {
    /// Checksum must be computed or checked manually.
    Manual,

    /// The checksum field is filled or checked by the NIC.
    Ignored,
}

impl Checksum {
    /// Check if a checksum should be calculated by the library.
    ///
    /// Otherwise it is ignored due to the assumption that it was offloaded or is otherwise
    /// undesirable to check.
    pub fn manual(self) -> bool {
        match self {
            Checksum::Manual => true,
            Checksum::Ignored => false,
        }
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Checksum::Manual
    }
}

pub use self::error::{
    Error,
    Result};

pub use self::ip::checksum;

pub use self::ip::{
    Version as IpVersion,
    Protocol as IpProtocol,
    Address as IpAddress};

pub use self::ipv4::{
    Address as Ipv4Address,
    HEADER_LEN as IPV4_HEADER_LEN};

pub use self::ipv6::{
    Address as Ipv6Address,
    HEADER_LEN as IPV6_HEADER_LEN};

pub use self::tcp::{
    SeqNumber as TcpSeqNumber,
    TcpOption,
    Flags as TcpFlags,
    HEADER_LEN as TCP_HEADER_LEN};

pub use self::tcpip::Packet as TcpIpPacket;

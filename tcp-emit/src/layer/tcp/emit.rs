use crate::nic::{Device, Statistics};
use crate::wire::{IpProtocol, IpVersion, TcpFlags, TcpIpPacket, TcpOption};
use crate::wire::{IPV6_HEADER_LEN, TCP_HEADER_LEN};

use super::Connection;

/// Stamp the IP header and the checksums on the segment in the device buffer.
///
/// The TCP header, its flags and the length of the device must be set already. This fills in the
/// time to live, the length field of the IP header and the fixed values of the version dependent
/// fields, clears the urgent pointer and then computes the checksums. An IPv4 packet takes the
/// next value of the identification counter of the device. Both the `tcp_sent` and `ip_sent`
/// statistics are incremented.
///
/// When the device offloads checksums, their fields are left zeroed.
///
/// # Panics
/// This function panics if the device length does not cover the IP and TCP headers.
pub fn finalize<B, S>(dev: &mut Device<B, S>)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Statistics,
{
    let version = dev.version();
    let len = dev.len();
    assert!(len >= version.header_len() + TCP_HEADER_LEN,
        "finalizing a segment of {} octets", len);

    let hop_limit = dev.hop_limit();
    let checksum = dev.checksum();
    let ident = match version {
        IpVersion::Ipv4 => Some(dev.next_ident()),
        IpVersion::Ipv6 => None,
    };

    let mut packet = dev.packet_mut();
    packet.set_hop_limit(hop_limit);
    match version {
        IpVersion::Ipv4 => packet.set_ip_len(len as u16),
        IpVersion::Ipv6 => packet.set_ip_len((len - IPV6_HEADER_LEN) as u16),
    }
    packet.set_urgent_at(0);

    packet.set_ip_version(version.number());
    packet.set_traffic_class(0);
    match ident {
        Some(ident) => {
            packet.set_ipv4_header_len(version.header_len() as u8);
            packet.set_frag_field(0);
            packet.set_ident(ident);
        }
        None => packet.set_flow_label(0),
    }

    if checksum.manual() {
        packet.fill_checksum(len);
        packet.fill_ip_checksum();
    } else {
        packet.set_checksum(0);
        if ident.is_some() {
            packet.set_ip_checksum(0);
        }
    }

    net_trace!("tcp: outgoing {} segment of {} octets", version, len);

    let stats = dev.statistics_mut();
    stats.tcp_sent();
    stats.ip_sent();
}

/// Fill in the fields derived from the connection and finalize the segment.
///
/// Sequence and acknowledgement numbers are copied from the connection, the ports and the remote
/// address as well. The source address is the address of the device. A stopped connection
/// advertises a zero window, otherwise the receive window of the device is used.
///
/// Flags, length and data offset must be set by the caller, see [`data`] and [`syn`].
///
/// [`data`]: fn.data.html
/// [`syn`]: fn.syn.html
///
/// # Panics
/// This function panics if the remote address of the connection is not of the IP version of the
/// device, or under the conditions of [`finalize`].
///
/// [`finalize`]: fn.finalize.html
pub fn populate<B, S>(dev: &mut Device<B, S>, conn: &Connection)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Statistics,
{
    let window = conn.window(dev.recv_window());
    let src_addr = dev.address();

    let mut packet = dev.packet_mut();
    packet.set_ack_number(conn.rcv_nxt);
    packet.set_seq_number(conn.snd_nxt);
    packet.set_protocol(IpProtocol::Tcp);
    packet.set_src_port(conn.local_port);
    packet.set_dst_port(conn.remote_port);
    packet.set_src_addr(src_addr);
    packet.set_dst_addr(conn.remote_addr);
    packet.set_window_len(window);

    finalize(dev)
}

/// Send a segment of a connection with data, control flags or both.
///
/// The payload has already been written to the buffer, directly after a TCP header without
/// options (see [`Device::payload_mut`]). The `len` is the total length of the segment from the
/// start of the IP header.
///
/// [`Device::payload_mut`]: ../../nic/struct.Device.html#method.payload_mut
///
/// # Panics
/// This function panics if `len` is shorter than the headers or longer than the MTU of the
/// device, or if the remote address of the connection is not of the IP version of the device.
pub fn data<B, S>(dev: &mut Device<B, S>, conn: &Connection, flags: TcpFlags, len: usize)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Statistics,
{
    dev.set_len(len);

    let mut packet = dev.packet_mut();
    packet.set_flags(flags);
    packet.set_header_len(TCP_HEADER_LEN);

    populate(dev, conn)
}

/// Answer the segment in the device buffer with a reset.
///
/// There is no connection the inbound segment belongs to, the reply is built from its headers
/// alone and must be made before anything else modifies them. The reply acknowledges the sequence
/// number of the inbound segment plus one and takes its acknowledgement number as the sequence
/// number. Ports are swapped, the reply goes to the source of the inbound segment and is sent from
/// the address of the device. It carries neither options nor data, and the window field of the
/// inbound segment is kept.
///
/// # Panics
/// This function panics if the device buffer does not hold a TCP segment of the IP version of the
/// device, see [`TcpIpPacket::new_inbound`].
///
/// [`TcpIpPacket::new_inbound`]: ../../wire/struct.TcpIpPacket.html#method.new_inbound
pub fn reset<B, S>(dev: &mut Device<B, S>)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Statistics,
{
    let version = dev.version();
    if let Err(err) = TcpIpPacket::new_inbound(dev.packet().as_bytes(), version) {
        panic!("no {} segment to reset: {}", version, err);
    }

    dev.statistics_mut().tcp_rst();

    let src_addr = dev.address();
    let mut packet = dev.packet_mut();
    let seq_number = packet.seq_number();
    let ack_number = packet.ack_number();
    packet.set_seq_number(ack_number);
    packet.set_ack_number(seq_number + 1);

    let src_port = packet.src_port();
    let dst_port = packet.dst_port();
    packet.set_src_port(dst_port);
    packet.set_dst_port(src_port);

    let peer = packet.src_addr();
    packet.set_dst_addr(peer);
    packet.set_src_addr(src_addr);

    packet.set_flags(TcpFlags::RST | TcpFlags::ACK);
    packet.set_header_len(TCP_HEADER_LEN);

    net_debug!("tcp: reset to {}:{} seq {} ack {}",
        peer, src_port, ack_number, seq_number + 1);

    dev.set_len(version.header_len() + TCP_HEADER_LEN);
    finalize(dev)
}

/// Send a segment opening a connection, advertising the maximum segment size of the device.
///
/// The `flags` are used verbatim. A SYN usually has only the SYN flag set and its answer both SYN
/// and ACK, it is up to the caller to choose. The segment carries the MSS option and no data.
///
/// # Panics
/// This function panics if the remote address of the connection is not of the IP version of the
/// device.
pub fn syn<B, S>(dev: &mut Device<B, S>, conn: &Connection, flags: TcpFlags)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    S: Statistics,
{
    let version = dev.version();
    let mss = dev.mss();
    let options = version.header_len() + TCP_HEADER_LEN;
    dev.set_len(options + TcpOption::MSS_LEN);

    let mut packet = dev.packet_mut();
    packet.set_flags(flags);
    TcpOption::MaxSegmentSize(mss)
        .emit(&mut packet.as_bytes_mut()[options..options + TcpOption::MSS_LEN]);
    packet.set_header_len(TCP_HEADER_LEN + TcpOption::MSS_LEN);

    net_debug!("tcp: {} to {}:{} with mss {}",
        flags, conn.remote_addr, conn.remote_port, mss);

    populate(dev, conn)
}

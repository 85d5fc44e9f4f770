//! Tcp layer tests.
//!
//! Each test builds segments in a buffer that still holds garbage of some earlier packet, so that
//! every field the emitters are responsible for has to be written and not merely left zeroed.
use std::sync::Arc;
use std::thread;

use super::*;
use crate::nic::{Config, Counters, Device, Exclusive, Statistics};
use crate::wire::{checksum, Checksum, IpAddress, IpProtocol, IpVersion};
use crate::wire::{Ipv4Address, Ipv6Address, TcpFlags, TcpIpPacket, TcpSeqNumber};

const ADDR_A: Ipv4Address = Ipv4Address::new(192, 168, 0, 1);
const ADDR_B: Ipv4Address = Ipv4Address::new(192, 168, 0, 2);
const ADDR_C: Ipv4Address = Ipv4Address::new(192, 168, 0, 255);

const GARBAGE: u8 = 0xa5;

fn addr6_a() -> Ipv6Address {
    Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)
}

fn addr6_b() -> Ipv6Address {
    Ipv6Address::new(0xfe80, 0, 0, 0, 0, 0, 0, 2)
}

fn device(config: Config) -> Device<Vec<u8>, Counters> {
    let buffer = vec![GARBAGE; config.link_header_len + config.mtu];
    Device::with_statistics(buffer, config, Counters::default()).unwrap()
}

fn device_v4() -> Device<Vec<u8>, Counters> {
    device(Config::ipv4(ADDR_A).recv_window(4096))
}

fn device_v6() -> Device<Vec<u8>, Counters> {
    device(Config::ipv6(addr6_a()).recv_window(4096))
}

fn connection(local: IpAddress, remote: IpAddress) -> Connection {
    let mut conn = Connection::new((local, 1234), (remote, 80));
    conn.snd_nxt = TcpSeqNumber(100);
    conn.rcv_nxt = TcpSeqNumber(500);
    conn
}

/// The checksum as computed independently over the finished segment.
fn expected_checksum(packet: &TcpIpPacket<&[u8]>, len: usize) -> u16 {
    let mut segment = packet.as_bytes()[packet.version().header_len()..len].to_vec();
    segment[16] = 0;
    segment[17] = 0;
    !checksum::combine(&[
        checksum::pseudo_header(&packet.src_addr(), &packet.dst_addr(),
                                IpProtocol::Tcp, segment.len() as u32),
        checksum::data(&segment),
    ])
}

/// Place an inbound segment from `src` to `dst` in the device buffer.
fn inbound<S>(dev: &mut Device<Vec<u8>, S>, src: (IpAddress, u16), dst: (IpAddress, u16),
              seq: u32, ack: u32)
{
    let version = dev.version();
    let mut packet = dev.packet_mut();
    packet.set_ip_version(version.number());
    if version == IpVersion::Ipv4 {
        packet.set_ipv4_header_len(20);
    }
    packet.set_protocol(IpProtocol::Tcp);
    packet.set_src_addr(src.0);
    packet.set_dst_addr(dst.0);
    packet.set_src_port(src.1);
    packet.set_dst_port(dst.1);
    packet.set_seq_number(TcpSeqNumber::from_u32(seq));
    packet.set_ack_number(TcpSeqNumber::from_u32(ack));
    packet.set_header_len(20);
    packet.set_flags(TcpFlags::ACK);
}

#[test]
fn data_ipv4() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    data(&mut dev, &conn, TcpFlags::ACK, 40);
    assert_eq!(dev.len(), 40);

    let packet = dev.packet();
    assert_eq!(packet.ack_number(), TcpSeqNumber(500));
    assert_eq!(packet.seq_number(), TcpSeqNumber(100));
    assert_eq!(packet.src_port(), 1234);
    assert_eq!(packet.dst_port(), 80);
    assert_eq!(packet.src_addr(), IpAddress::Ipv4(ADDR_A));
    assert_eq!(packet.dst_addr(), IpAddress::Ipv4(ADDR_B));
    assert_eq!(packet.window_len(), 4096);
    assert_eq!(packet.flags(), TcpFlags::ACK);
    assert_eq!(packet.header_len(), 20);
    assert_eq!(packet.urgent_at(), 0);
    assert_eq!(packet.checksum(), expected_checksum(&packet, 40));
    assert!(packet.verify_checksum(40));

    let bytes = packet.as_bytes();
    assert_eq!(&bytes[..10], &[0x45, 0x00, 0x00, 40, 0x00, 0x00, 0x00, 0x00, 64, 6]);
    assert!(packet.verify_ip_checksum());

    // The link layer header is not touched.
    assert!(dev.frame()[..14].iter().all(|&b| b == GARBAGE));
    assert_eq!(dev.frame().len(), 54);
}

#[test]
fn data_ipv6() {
    let mut dev = device_v6();
    let conn = connection(addr6_a().into(), addr6_b().into());

    data(&mut dev, &conn, TcpFlags::ACK, 60);

    let packet = dev.packet();
    assert_eq!(&packet.as_bytes()[..8], &[0x60, 0x00, 0x00, 0x00, 0x00, 20, 6, 64]);
    assert_eq!(packet.ack_number(), TcpSeqNumber(500));
    assert_eq!(packet.seq_number(), TcpSeqNumber(100));
    assert_eq!(packet.src_port(), 1234);
    assert_eq!(packet.dst_port(), 80);
    assert_eq!(packet.src_addr(), IpAddress::Ipv6(addr6_a()));
    assert_eq!(packet.dst_addr(), IpAddress::Ipv6(addr6_b()));
    assert_eq!(packet.window_len(), 4096);
    assert_eq!(packet.checksum(), expected_checksum(&packet, 60));
    assert!(packet.verify_checksum(60));
}

#[test]
fn data_with_payload() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    dev.payload_mut()[..11].copy_from_slice(b"hello world");
    data(&mut dev, &conn, TcpFlags::ACK | TcpFlags::PSH, 51);

    let packet = dev.packet();
    assert_eq!(packet.ip_len(), 51);
    assert_eq!(&packet.as_bytes()[40..51], b"hello world");
    assert_eq!(packet.checksum(), expected_checksum(&packet, 51));
    assert!(packet.verify_checksum(51));
    assert!(packet.verify_ip_checksum());
}

#[test]
fn data_clears_reserved_bits() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());
    dev.packet_mut().as_bytes_mut()[32] = 0x51;

    data(&mut dev, &conn, TcpFlags::FIN | TcpFlags::ACK, 40);
    assert_eq!(dev.packet().as_bytes()[32], 0x50);
    assert_eq!(dev.packet().as_bytes()[33], 0x11);
}

#[test]
fn ip_length_by_version() {
    for &len in &[40, 41, 100, 1500] {
        let mut dev = device_v4();
        let conn = connection(ADDR_A.into(), ADDR_B.into());
        data(&mut dev, &conn, TcpFlags::ACK, len);
        assert_eq!(usize::from(dev.packet().ip_len()), len);
    }

    for &len in &[60, 61, 100, 1500] {
        let mut dev = device_v6();
        let conn = connection(addr6_a().into(), addr6_b().into());
        data(&mut dev, &conn, TcpFlags::ACK, len);
        assert_eq!(usize::from(dev.packet().ip_len()), len - 40);
    }
}

#[test]
fn window_of_stopped_connection() {
    let mut conn = connection(ADDR_A.into(), ADDR_B.into());
    for &capacity in &[0, 1, 4096, 65535] {
        let mut dev = device_v4();
        dev.set_recv_window(capacity);

        conn.stopped = true;
        data(&mut dev, &conn, TcpFlags::ACK, 40);
        assert_eq!(dev.packet().window_len(), 0);

        conn.stopped = false;
        data(&mut dev, &conn, TcpFlags::ACK, 40);
        assert_eq!(dev.packet().window_len(), capacity);
    }
}

#[test]
fn default_window_is_mss() {
    let mut dev = device(Config::ipv4(ADDR_A));
    let conn = connection(ADDR_A.into(), ADDR_B.into());
    data(&mut dev, &conn, TcpFlags::ACK, 40);
    assert_eq!(dev.packet().window_len(), 1460);
}

#[test]
fn ident_increments_and_wraps() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());
    dev.set_ident(65534);

    let mut seen = Vec::new();
    for _ in 0..3 {
        data(&mut dev, &conn, TcpFlags::ACK, 40);
        seen.push(dev.packet().ident());
        assert!(dev.packet().verify_ip_checksum());
    }
    assert_eq!(seen, [65534, 65535, 0]);
    assert_eq!(dev.ident(), 1);
}

#[test]
fn ident_untouched_by_ipv6() {
    let mut dev = device_v6();
    let conn = connection(addr6_a().into(), addr6_b().into());
    dev.set_ident(7);
    data(&mut dev, &conn, TcpFlags::ACK, 60);
    syn(&mut dev, &conn, TcpFlags::SYN);
    assert_eq!(dev.ident(), 7);
}

#[test]
fn checksum_offload() {
    let config = Config::ipv4(ADDR_A).checksum(Checksum::Ignored);
    let mut dev = device(config);
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    data(&mut dev, &conn, TcpFlags::ACK, 40);
    assert_eq!(dev.packet().checksum(), 0);
    assert_eq!(dev.packet().ip_checksum(), 0);

    let config = Config::ipv6(addr6_a()).checksum(Checksum::Ignored);
    let mut dev = device(config);
    let conn = connection(addr6_a().into(), addr6_b().into());
    data(&mut dev, &conn, TcpFlags::ACK, 60);
    assert_eq!(dev.packet().checksum(), 0);
}

#[test]
fn hop_limit_from_config() {
    let mut dev = device(Config::ipv6(addr6_a()).hop_limit(255));
    let conn = connection(addr6_a().into(), addr6_b().into());
    data(&mut dev, &conn, TcpFlags::ACK, 60);
    assert_eq!(dev.packet().hop_limit(), 255);
}

#[test]
fn reset_ipv4() {
    let mut dev = device_v4();
    inbound(&mut dev, (ADDR_B.into(), 80), (ADDR_A.into(), 1234), 10, 20);

    reset(&mut dev);
    assert_eq!(dev.len(), 40);

    let packet = dev.packet();
    assert_eq!(packet.seq_number(), TcpSeqNumber(20));
    assert_eq!(packet.ack_number(), TcpSeqNumber(11));
    assert_eq!(packet.src_port(), 1234);
    assert_eq!(packet.dst_port(), 80);
    assert_eq!(packet.flags(), TcpFlags::RST | TcpFlags::ACK);
    assert_eq!(packet.header_len(), 20);
    assert_eq!(packet.ip_len(), 40);
    assert_eq!(packet.src_addr(), IpAddress::Ipv4(ADDR_A));
    assert_eq!(packet.dst_addr(), IpAddress::Ipv4(ADDR_B));
    assert_eq!(packet.options(), Ok(&[][..]));
    assert_eq!(packet.checksum(), expected_checksum(&packet, 40));
    assert!(packet.verify_ip_checksum());
}

#[test]
fn reset_ipv6() {
    let mut dev = device_v6();
    inbound(&mut dev, (addr6_b().into(), 80), (addr6_a().into(), 1234), 10, 20);

    reset(&mut dev);
    assert_eq!(dev.len(), 60);

    let packet = dev.packet();
    assert_eq!(packet.seq_number(), TcpSeqNumber(20));
    assert_eq!(packet.ack_number(), TcpSeqNumber(11));
    assert_eq!(packet.src_port(), 1234);
    assert_eq!(packet.dst_port(), 80);
    assert_eq!(packet.ip_len(), 20);
    assert_eq!(packet.src_addr(), IpAddress::Ipv6(addr6_a()));
    assert_eq!(packet.dst_addr(), IpAddress::Ipv6(addr6_b()));
    assert!(packet.verify_checksum(60));
}

#[test]
fn reset_from_own_address() {
    let mut dev = device_v4();
    // Addressed to the broadcast address, the reply still comes from the device.
    inbound(&mut dev, (ADDR_B.into(), 80), (ADDR_C.into(), 1234), 10, 20);

    reset(&mut dev);
    assert_eq!(dev.packet().src_addr(), IpAddress::Ipv4(ADDR_A));
    assert_eq!(dev.packet().dst_addr(), IpAddress::Ipv4(ADDR_B));
}

#[test]
fn reset_ports_swap_back() {
    let mut dev = device_v4();
    inbound(&mut dev, (ADDR_B.into(), 80), (ADDR_A.into(), 1234), 10, 20);

    reset(&mut dev);
    reset(&mut dev);
    assert_eq!(dev.packet().src_port(), 80);
    assert_eq!(dev.packet().dst_port(), 1234);
}

#[test]
fn reset_ack_carry() {
    let cases = [
        (0x0000_0000u32, 0x0000_0001u32),
        (0x0000_00ff, 0x0000_0100),
        (0x00ff_ffff, 0x0100_0000),
        (0x7fff_ffff, 0x8000_0000),
        (0x1234_5678, 0x1234_5679),
        (0xffff_ffff, 0x0000_0000),
    ];

    for &(seq, ack) in &cases {
        let mut dev = device_v4();
        inbound(&mut dev, (ADDR_B.into(), 80), (ADDR_A.into(), 1234), seq, 0xdead_beef);
        reset(&mut dev);

        let packet = dev.packet();
        assert_eq!(&packet.as_bytes()[28..32], &ack.to_be_bytes());
        assert_eq!(&packet.as_bytes()[24..28], &0xdead_beefu32.to_be_bytes());
    }
}

#[test]
#[should_panic]
fn reset_without_tcp_segment() {
    let mut dev = device_v4();
    inbound(&mut dev, (ADDR_B.into(), 80), (ADDR_A.into(), 1234), 10, 20);
    dev.packet_mut().set_protocol(IpProtocol::Udp);
    reset(&mut dev);
}

#[test]
#[should_panic]
fn reset_wrong_version() {
    let mut dev = device_v6();
    dev.packet_mut().as_bytes_mut()[0] = 0x45;
    reset(&mut dev);
}

#[test]
fn syn_ipv4() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    syn(&mut dev, &conn, TcpFlags::SYN);
    assert_eq!(dev.len(), 44);

    let packet = dev.packet();
    assert_eq!(packet.flags(), TcpFlags::SYN);
    assert_eq!(packet.header_len(), 24);
    assert_eq!(packet.as_bytes()[32], 0x60);
    assert_eq!(packet.options(), Ok(&[2, 4, 0x05, 0xb4][..]));
    assert_eq!(packet.ip_len(), 44);
    assert_eq!(packet.seq_number(), TcpSeqNumber(100));
    assert_eq!(packet.window_len(), 4096);
    assert_eq!(packet.checksum(), expected_checksum(&packet, 44));
    assert!(packet.verify_ip_checksum());
}

#[test]
fn synack_ipv6() {
    let mut dev = device(Config::ipv6(addr6_a()).mtu(9000));
    let conn = connection(addr6_a().into(), addr6_b().into());

    syn(&mut dev, &conn, TcpFlags::SYN | TcpFlags::ACK);
    assert_eq!(dev.len(), 64);

    let packet = dev.packet();
    assert_eq!(packet.flags(), TcpFlags::SYN | TcpFlags::ACK);
    // 9000 - 40 - 20
    assert_eq!(packet.options(), Ok(&[2, 4, 0x22, 0xec][..]));
    assert_eq!(packet.ip_len(), 24);
    assert_eq!(packet.ack_number(), TcpSeqNumber(500));
    assert!(packet.verify_checksum(64));
}

#[test]
fn syn_flags_verbatim() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    syn(&mut dev, &conn, TcpFlags::ACK);
    assert_eq!(dev.packet().flags(), TcpFlags::ACK);
    assert_eq!(dev.packet().header_len(), 24);
}

#[test]
fn statistics() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    syn(&mut dev, &conn, TcpFlags::SYN);
    data(&mut dev, &conn, TcpFlags::ACK, 40);
    inbound(&mut dev, (ADDR_B.into(), 80), (ADDR_A.into(), 1234), 10, 20);
    reset(&mut dev);

    assert_eq!(*dev.statistics(), Counters { tcp_sent: 3, ip_sent: 3, tcp_rst: 1 });
}

#[test]
fn shared_statistics() {
    let mut counters = Counters::default();
    {
        let buffer = vec![0; 1514];
        let mut dev = Device::with_statistics(buffer, Config::ipv4(ADDR_A), &mut counters)
            .unwrap();
        let conn = connection(ADDR_A.into(), ADDR_B.into());
        data(&mut dev, &conn, TcpFlags::ACK, 40);
        dev.statistics_mut().tcp_rst();
    }
    assert_eq!(counters, Counters { tcp_sent: 1, ip_sent: 1, tcp_rst: 1 });
}

#[test]
#[should_panic]
fn data_longer_than_mtu() {
    let mut dev = device_v4();
    let conn = connection(ADDR_A.into(), ADDR_B.into());
    data(&mut dev, &conn, TcpFlags::ACK, 1501);
}

#[test]
#[should_panic]
fn connection_of_other_version() {
    let mut dev = device_v4();
    let conn = connection(addr6_a().into(), addr6_b().into());
    data(&mut dev, &conn, TcpFlags::ACK, 40);
}

#[test]
#[should_panic]
fn finalize_empty() {
    let mut dev = device_v4();
    finalize(&mut dev);
}

#[test]
fn exclusive_between_threads() {
    let dev = Arc::new(Exclusive::new(device_v4()));
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    let workers: Vec<_> = (0..4).map(|_| {
        let dev = Arc::clone(&dev);
        thread::spawn(move || {
            for _ in 0..100 {
                dev.with(|dev| {
                    data(dev, &conn, TcpFlags::ACK, 40);
                    assert!(dev.packet().verify_checksum(40));
                });
            }
        })
    }).collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let dev = Arc::try_unwrap(dev).ok().unwrap().into_inner();
    assert_eq!(dev.ident(), 400);
    assert_eq!(dev.statistics().tcp_sent, 400);
}

#[test]
fn exclusive_try_with() {
    let mut exclusive = Exclusive::from(device_v4());
    let conn = connection(ADDR_A.into(), ADDR_B.into());

    let len = exclusive.try_with(|dev| {
        syn(dev, &conn, TcpFlags::SYN);
        dev.len()
    });
    assert_eq!(len, Some(44));
    assert_eq!(exclusive.get_mut().statistics().tcp_sent, 1);
}

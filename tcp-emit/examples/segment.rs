//! Builds a single segment and dumps it.
//!
//! # Usage
//!
//! The example configures a device for the local address, builds one segment from or to the remote
//! address and writes the resulting IP packet in hex to standard out. Paste the output into any
//! packet dissector that accepts hex dumps to inspect it.
//!
//!   > $ cargo run --example segment -- 10.0.0.1 10.0.0.2 syn --seq 1000
//!
//!   > $ cargo run --example segment -- fe80::1 fe80::2 --mtu 9000 data --seq 1001 --ack 5001 hello
//!
//!   > $ cargo run --example segment -- 10.0.0.1 10.0.0.2 reset --seq 10 --ack 20
use std::io::{stdout, Write};
use std::net;
use std::process;
use structopt::StructOpt;

use tcp_emit::nic::{self, Counters, Device};
use tcp_emit::tcp::{self, Connection};
use tcp_emit::wire::{Checksum, IpAddress, TcpFlags, TcpSeqNumber};

fn main() {
    let Config {
        local,
        remote,
        local_port,
        remote_port,
        mtu,
        offload,
        segment,
    } = Config::from_args();

    let local = IpAddress::from(local);
    let remote = IpAddress::from(remote);
    if local.version() != remote.version() {
        eprintln!("Addresses {} and {} are of different IP versions", local, remote);
        process::exit(1);
    }

    let config = nic::Config::new(local)
        .mtu(mtu)
        .checksum(if offload { Checksum::Ignored } else { Checksum::Manual });
    let buffer = vec![0; config.link_header_len + config.mtu];
    let mut dev = Device::with_statistics(buffer, config, Counters::default())
        .expect("Invalid device configuration");

    let mut conn = Connection::new((local, local_port), (remote, remote_port));

    match segment {
        Segment::Data { seq, ack, fin, stopped, payload } => {
            conn.snd_nxt = TcpSeqNumber::from_u32(seq);
            conn.rcv_nxt = TcpSeqNumber::from_u32(ack);
            conn.stopped = stopped;

            let payload = payload.as_bytes();
            let room = dev.payload_mut();
            if payload.len() > room.len() {
                eprintln!("Payload of {} bytes exceeds the MSS {}", payload.len(), room.len());
                process::exit(1);
            }
            room[..payload.len()].copy_from_slice(payload);

            let mut flags = TcpFlags::ACK;
            if !payload.is_empty() {
                flags |= TcpFlags::PSH;
            }
            if fin {
                flags |= TcpFlags::FIN;
            }
            let len = dev.version().header_len() + 20 + payload.len();
            tcp::data(&mut dev, &conn, flags, len);
        },
        Segment::Syn { seq, ack } => {
            conn.snd_nxt = TcpSeqNumber::from_u32(seq);
            let flags = match ack {
                Some(ack) => {
                    conn.rcv_nxt = TcpSeqNumber::from_u32(ack);
                    TcpFlags::SYN | TcpFlags::ACK
                },
                None => TcpFlags::SYN,
            };
            tcp::syn(&mut dev, &conn, flags);
        },
        Segment::Reset { seq, ack } => {
            // Pretend the remote sent us a segment without a connection.
            let version = dev.version();
            let mut inbound = dev.packet_mut();
            inbound.set_ip_version(version.number());
            if let IpAddress::Ipv4(_) = local {
                inbound.set_ipv4_header_len(20);
            }
            inbound.set_protocol(tcp_emit::wire::IpProtocol::Tcp);
            inbound.set_src_addr(remote);
            inbound.set_dst_addr(local);
            inbound.set_src_port(remote_port);
            inbound.set_dst_port(local_port);
            inbound.set_seq_number(TcpSeqNumber::from_u32(seq));
            inbound.set_ack_number(TcpSeqNumber::from_u32(ack));
            inbound.set_header_len(20);
            inbound.set_flags(TcpFlags::ACK);
            tcp::reset(&mut dev);
        },
    }

    let out = stdout();
    let mut out = out.lock();

    let packet = dev.packet();
    writeln!(out, "# {} {} -> {}, flags {}, {} bytes",
        dev.version(), packet.src_addr(), packet.dst_addr(), packet.flags(), dev.len())
        .unwrap();
    for (idx, line) in packet.as_bytes()[..dev.len()].chunks(16).enumerate() {
        write!(out, "{:04x} ", idx*16).unwrap();
        for byte in line {
            write!(out, " {:02x}", byte).unwrap();
        }
        writeln!(out).unwrap();
    }

    let stats = dev.statistics();
    writeln!(out, "# tcp sent {}, ip sent {}, rst {}",
        stats.tcp_sent, stats.ip_sent, stats.tcp_rst).unwrap();
}

#[derive(StructOpt)]
struct Config {
    local: net::IpAddr,
    remote: net::IpAddr,
    #[structopt(long = "local-port", default_value = "49152")]
    local_port: u16,
    #[structopt(long = "remote-port", default_value = "80")]
    remote_port: u16,
    #[structopt(long = "mtu", default_value = "1500")]
    mtu: usize,
    /// Leave checksums to the card.
    #[structopt(long = "offload")]
    offload: bool,

    #[structopt(subcommand)]
    segment: Segment,
}

#[derive(StructOpt)]
enum Segment {
    /// A segment carrying data or a plain acknowledgement.
    #[structopt(name = "data")]
    Data {
        #[structopt(long = "seq", default_value = "0")]
        seq: u32,
        #[structopt(long = "ack", default_value = "0")]
        ack: u32,
        #[structopt(long = "fin")]
        fin: bool,
        /// Advertise a zero window.
        #[structopt(long = "stopped")]
        stopped: bool,
        #[structopt(default_value = "")]
        payload: String,
    },

    /// A SYN, or a SYN-ACK when an acknowledgement number is given.
    #[structopt(name = "syn")]
    Syn {
        #[structopt(long = "seq", default_value = "0")]
        seq: u32,
        #[structopt(long = "ack")]
        ack: Option<u32>,
    },

    /// A reset answering a segment from the remote.
    #[structopt(name = "reset")]
    Reset {
        #[structopt(long = "seq", default_value = "0")]
        seq: u32,
        #[structopt(long = "ack", default_value = "0")]
        ack: u32,
    },
}

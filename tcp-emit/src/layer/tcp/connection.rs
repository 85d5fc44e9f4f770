use crate::wire::{IpAddress, TcpSeqNumber};

/// The part of a connection's state that ends up in an outgoing segment.
///
/// The record is owned by the connection state machine which also advances the sequence numbers.
/// Sending a segment never modifies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// The port of this host.
    pub local_port: u16,
    /// The port of the peer.
    pub remote_port: u16,
    /// The address of this host, as the connection was established.
    pub local_addr: IpAddress,
    /// The address of the peer.
    pub remote_addr: IpAddress,
    /// The sequence number of the next octet to send.
    pub snd_nxt: TcpSeqNumber,
    /// The sequence number of the next octet expected from the peer.
    pub rcv_nxt: TcpSeqNumber,
    /// Flow control hold, advertising a zero window while set.
    pub stopped: bool,
}

impl Connection {
    /// A connection between two endpoints with all sequence numbers at zero.
    ///
    /// # Panics
    /// This function panics if the addresses belong to different IP versions.
    pub fn new(local: (IpAddress, u16), remote: (IpAddress, u16)) -> Self {
        assert_eq!(local.0.version(), remote.0.version(),
            "connection between {} and {}", local.0, remote.0);
        Connection {
            local_port: local.1,
            remote_port: remote.1,
            local_addr: local.0,
            remote_addr: remote.0,
            snd_nxt: TcpSeqNumber::default(),
            rcv_nxt: TcpSeqNumber::default(),
            stopped: false,
        }
    }

    /// The window to advertise, given the capacity of the device.
    pub fn window(&self, capacity: u16) -> u16 {
        if self.stopped {
            0
        } else {
            capacity
        }
    }
}

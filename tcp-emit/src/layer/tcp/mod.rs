//! The TCP layer, outbound direction.
//!
//! Offers the construction of the segments that a connection oriented protocol needs to send.
//! Unlike a full stack this layer holds no connection table and no timers. The state machine above
//! it owns a [`Connection`] record per connection and decides which segment is due:
//!
//! * [`data`] for anything carrying payload or plain control flags such as an ACK or FIN.
//! * [`syn`] for the SYN opening a connection or the SYN-ACK answering one. This is the only
//!   segment carrying an option, the maximum segment size of the device.
//! * [`reset`] answers a segment for which no connection exists. It works on the inbound segment
//!   still resident in the device buffer and needs no connection record at all.
//!
//! [`Connection`]: struct.Connection.html
//! [`data`]: fn.data.html
//! [`syn`]: fn.syn.html
//! [`reset`]: fn.reset.html
//!
//! All three share their tail. [`populate`] fills the fields derived from the connection and then
//! calls [`finalize`], which stamps the IP header and computes the checksums. The reset skips
//! straight to the finalizer as the inbound header already holds everything else.
//!
//! [`populate`]: fn.populate.html
//! [`finalize`]: fn.finalize.html
//!
//! ## Sending a segment
//!
//! ```
//! use tcp_emit::nic::{Config, Device};
//! use tcp_emit::tcp::{self, Connection};
//! use tcp_emit::wire::{Ipv4Address, TcpFlags, TcpSeqNumber};
//!
//! let local = Ipv4Address::new(10, 0, 0, 1);
//! let remote = Ipv4Address::new(10, 0, 0, 2);
//! let mut dev = Device::new(vec![0; 1514], Config::ipv4(local)).unwrap();
//!
//! let mut conn = Connection::new((local.into(), 49152), (remote.into(), 80));
//! conn.snd_nxt = TcpSeqNumber(1000);
//! tcp::syn(&mut dev, &conn, TcpFlags::SYN);
//! assert_eq!(dev.len(), 44);
//!
//! // Write a payload and send it.
//! dev.payload_mut()[..5].copy_from_slice(b"hello");
//! conn.snd_nxt += 1;
//! tcp::data(&mut dev, &conn, TcpFlags::ACK | TcpFlags::PSH, 45);
//! assert!(dev.packet().verify_checksum(45));
//! ```
mod connection;
mod emit;

#[cfg(test)]
mod tests;

pub use self::connection::Connection;
pub use self::emit::{data, finalize, populate, reset, syn};

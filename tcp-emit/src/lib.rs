//! Construction of outbound TCP segments in a device's output buffer.
//!
//! ## Table of contents
//!
//! 1. [Overview](#overview)
//! 2. [Design](#design)
//! 3. [The wire module](wire/index.html)
//! 4. [The device context](nic/index.html)
//! 5. [The tcp emitters](layer/tcp/index.html)
//!
//! ## Overview
//!
//! This crate is the last step of a TCP/IP stack before a segment is handed to the driver. Some
//! other part of the stack, the connection state machine or the input path, has decided *that* a
//! segment goes out. What remains is filling in every header field of IP and TCP, in the right
//! order, so that the checksums come out right. Four shapes of segments are supported:
//!
//! * A generic segment carrying data or control flags, see [`tcp::data`].
//! * A reset answering a segment for which no connection exists, see [`tcp::reset`].
//! * A SYN or SYN-ACK advertising the maximum segment size, see [`tcp::syn`].
//!
//! [`tcp::data`]: layer/tcp/fn.data.html
//! [`tcp::reset`]: layer/tcp/fn.reset.html
//! [`tcp::syn`]: layer/tcp/fn.syn.html
//!
//! Both IPv4 and IPv6 are supported. The family is a property of the device and not of the single
//! segment, a dual-stack host simply has two device contexts.
//!
//! ## Design
//!
//! Nothing within this crate dynamically allocates memory. The buffer is owned by the device
//! context, the caller chooses its type (a `Vec<u8>`, an array, a slice into some ring of
//! descriptors) as long as it derefs to bytes.
//!
//! The emitters can not fail. A segment is built from trusted state, the connection record and the
//! device context, and the only possible failure is misuse by the caller such as a length larger
//! than the MTU. Such misuse is a programming error and panics instead of silently writing past
//! the header. Validation happens once when the device context is created, see [`Device::new`].
//!
//! [`Device::new`]: nic/struct.Device.html#method.new
//!
//! Nothing blocks. Every call is bounded in time and only rewrites the buffer in place. Callers
//! that share a device between threads wrap it in [`Exclusive`] instead of disabling preemption.
//!
//! [`Exclusive`]: nic/struct.Exclusive.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use] mod macros;
pub mod layer;
pub mod nic;
pub mod wire;

pub use layer::tcp;

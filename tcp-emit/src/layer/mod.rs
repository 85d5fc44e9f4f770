//! The process logic of protocol layers.
//!
//! ## Layering
//!
//! Each protocol layer is split into two parts; the packet logic contained in `wire` and the
//! processing part in this module. Where the `wire` module only knows about octets and fields, a
//! layer knows about the state that determines their values. For TCP this is the connection record
//! and the device context.
//!
//! ## Sending
//!
//! Only the sending direction exists here. The layer above, typically a connection state machine,
//! decides that a segment is to be sent and hands over the device whose output buffer receives the
//! segment. The layer then fills in its fields and leaves the buffer ready for transmission. The
//! actual transmit call of the driver is not part of this crate.
pub mod tcp;

/// The result type of layer operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The error type of layer operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation was not permitted.
    ///
    /// Returned when a configuration can not be used for sending segments at all, for example an
    /// MTU that does not leave room for the headers.
    Illegal,

    /// Not enough space for the requested packet.
    ///
    /// Returned when the provided buffer can not hold a packet of the configured MTU. In contrast
    /// to `Illegal` this would signal that a smaller size may be possible.
    BadSize,
}

/// Can convert from a wire error.
///
/// This indicates some layer tried to operate on a packet but failed.
impl From<crate::wire::Error> for Error {
    fn from(err: crate::wire::Error) -> Self {
        match err {
            crate::wire::Error::Truncated => Error::BadSize,
            _ => Error::Illegal,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::Illegal => write!(f, "operation not permitted"),
            Error::BadSize => write!(f, "buffer too small"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

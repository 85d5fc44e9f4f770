use core::fmt;

/// The error type for access to packet buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The buffer is shorter than the headers that are to be accessed.
    ///
    /// For the combined IP and TCP view this means the buffer could not hold the fixed header of
    /// the IP family followed by the fixed TCP header. For variable length parts such as the TCP
    /// options, the length field pointed beyond the end of the buffer.
    Truncated,

    /// The buffer holds something else than expected.
    ///
    /// E.g. an IPv6 header where an IPv4 header was expected, or an IP packet that does not
    /// encapsulate TCP.
    Unrecognized,

    /// A field was recognized but was self-contradictory.
    ///
    /// Examples: a TCP data offset smaller than the fixed header; an MSS option with a length
    /// other than four.
    Malformed,

    /// A feature was requested that this crate does not implement.
    Unsupported,
}

/// The result type for packet buffer access.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated     => write!(f, "truncated packet"),
            Error::Unrecognized  => write!(f, "unrecognized packet"),
            Error::Unsupported   => write!(f, "unsupported option"),
            Error::Malformed     => write!(f, "malformed packet"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

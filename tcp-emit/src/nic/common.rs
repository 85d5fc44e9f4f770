//! Useful base types for implementing a device context.

/// The IPv4 identification counter of a device.
///
/// Every IPv4 packet leaving the device takes the current value, after which the counter advances
/// by one. It wraps around silently from `65535` to `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ident(u16);

impl Ident {
    /// A counter that hands out `initial` first.
    pub const fn new(initial: u16) -> Self {
        Ident(initial)
    }

    /// The value the next packet will get.
    pub fn peek(&self) -> u16 {
        self.0
    }

    /// Take the current value and advance the counter.
    pub fn next(&mut self) -> u16 {
        let ident = self.0;
        self.0 = ident.wrapping_add(1);
        ident
    }
}

/// A sink for send statistics.
///
/// Counting is best effort. Implementations must not block and have no way to report failure.
pub trait Statistics {
    /// A TCP segment was finalized.
    fn tcp_sent(&mut self);

    /// An IP packet was finalized.
    fn ip_sent(&mut self);

    /// A reset was generated in reply to an unexpected segment.
    fn tcp_rst(&mut self);
}

/// Simple wrapping counters for each statistic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Counters {
    /// Number of finalized TCP segments.
    pub tcp_sent: u32,
    /// Number of finalized IP packets.
    pub ip_sent: u32,
    /// Number of generated resets.
    pub tcp_rst: u32,
}

impl Statistics for Counters {
    fn tcp_sent(&mut self) {
        self.tcp_sent = self.tcp_sent.wrapping_add(1);
    }

    fn ip_sent(&mut self) {
        self.ip_sent = self.ip_sent.wrapping_add(1);
    }

    fn tcp_rst(&mut self) {
        self.tcp_rst = self.tcp_rst.wrapping_add(1);
    }
}

/// Discards all statistics.
impl Statistics for () {
    fn tcp_sent(&mut self) { }

    fn ip_sent(&mut self) { }

    fn tcp_rst(&mut self) { }
}

impl<S: Statistics + ?Sized> Statistics for &'_ mut S {
    fn tcp_sent(&mut self) {
        (**self).tcp_sent()
    }

    fn ip_sent(&mut self) {
        (**self).ip_sent()
    }

    fn tcp_rst(&mut self) {
        (**self).tcp_rst()
    }
}

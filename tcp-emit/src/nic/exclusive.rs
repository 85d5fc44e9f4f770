use spin::Mutex;

use super::Device;

/// A device context that can be shared between threads.
///
/// All segment construction for one device has to be serialized. Instead of disabling preemption
/// around each call, the device is placed behind a spin lock and every call happens inside the
/// closure passed to [`with`]. Nothing inside the closure may block, the emitters never do.
///
/// [`with`]: #method.with
pub struct Exclusive<B, S = ()> {
    inner: Mutex<Device<B, S>>,
}

impl<B, S> Exclusive<B, S> {
    /// Wrap a device.
    pub const fn new(device: Device<B, S>) -> Self {
        Exclusive { inner: Mutex::new(device) }
    }

    /// Run `f` with exclusive access to the device, spinning until it is available.
    pub fn with<R>(&self, f: impl FnOnce(&mut Device<B, S>) -> R) -> R {
        let mut device = self.inner.lock();
        f(&mut device)
    }

    /// Run `f` only if the device is not currently in use.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut Device<B, S>) -> R) -> Option<R> {
        let mut device = self.inner.try_lock()?;
        Some(f(&mut device))
    }

    /// Access the device through a unique reference, no locking is necessary.
    pub fn get_mut(&mut self) -> &mut Device<B, S> {
        self.inner.get_mut()
    }

    /// Unwrap the device.
    pub fn into_inner(self) -> Device<B, S> {
        self.inner.into_inner()
    }
}

impl<B, S> From<Device<B, S>> for Exclusive<B, S> {
    fn from(device: Device<B, S>) -> Self {
        Exclusive::new(device)
    }
}

//! Memory-mapped peripherals for the system bus.
//!
//! A `Device` sees absolute addresses. It answers reads it owns with `Some`, ignores
//! writes outside its range, and may also serve the video unit's address space and
//! drive the shared IRQ line.
//!
//! # Example
//!
//! ```rust
//! use nes6502::{Bus, MemoryBus, RamDevice, RomDevice};
//!
//! let mut bus = Bus::new();
//!
//! // 8 KiB work RAM at 0x6000-0x7FFF
//! bus.attach(RamDevice::new(0x6000, 0x2000));
//!
//! // 16 KiB program ROM, mirrored across 0x8000-0xFFFF
//! bus.attach(RomDevice::new(0x8000, vec![0xEA; 0x4000]));
//!
//! bus.write(0x6000, 0x80);
//! assert_eq!(bus.read(0x6000), 0x80);
//! assert_eq!(bus.read(0xC123), 0xEA);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use crate::bus::{ReadInterceptor, WriteInterceptor};

pub mod ram;
pub mod rom;

pub use ram::RamDevice;
pub use rom::RomDevice;

/// Abstract interface for memory-mapped hardware devices.
///
/// # Examples
///
/// ```rust
/// use nes6502::Device;
///
/// struct Latch {
///     value: u8,
/// }
///
/// impl Device for Latch {
///     fn read(&mut self, addr: u16) -> Option<u8> {
///         (addr == 0x4100).then_some(self.value)
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         if addr == 0x4100 {
///             self.value = value;
///         }
///     }
/// }
/// ```
pub trait Device {
    /// Returns the byte at `addr` if this device owns it.
    fn read(&mut self, addr: u16) -> Option<u8>;

    /// Stores `value` if this device owns `addr`; otherwise does nothing.
    fn write(&mut self, addr: u16, value: u8);

    /// Serves the video unit's address space. Most devices own none of it.
    fn ppu_read(&mut self, _addr: u16) -> Option<u8> {
        None
    }

    /// Whether the device is currently pulling the IRQ line low.
    fn has_interrupt(&self) -> bool {
        false
    }
}

/// A device shared between the bus and its owner.
///
/// The bus holds clones of this handle on each interceptor chain; the owner keeps
/// one to inspect or poke the device from outside the CPU.
pub struct SharedDevice<D> {
    inner: Arc<Mutex<D>>,
}

impl<D> SharedDevice<D> {
    /// Wraps a device.
    pub fn new(device: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(device)),
        }
    }

    /// Runs `f` with shared access to the device.
    pub fn with<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` with exclusive access to the device.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<D> Clone for SharedDevice<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Device + Send> ReadInterceptor for SharedDevice<D> {
    fn read(&mut self, addr: u16) -> Option<u8> {
        self.with_mut(|device| device.read(addr))
    }
}

impl<D: Device + Send> WriteInterceptor for SharedDevice<D> {
    fn write(&mut self, addr: u16, value: u8) {
        self.with_mut(|device| device.write(addr, value))
    }
}

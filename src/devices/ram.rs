//! RAM device implementation.
//!
//! A readable and writable window on the bus, such as cartridge work RAM at
//! 0x6000-0x7FFF.

use super::Device;
use crate::EmulatorError;

/// Read/write memory mapped at `base..base + size`.
///
/// # Examples
///
/// ```rust
/// use nes6502::{Device, RamDevice};
///
/// let mut ram = RamDevice::new(0x6000, 0x2000);
///
/// ram.write(0x6042, 0xAA);
/// assert_eq!(ram.read(0x6042), Some(0xAA));
///
/// // Outside the window
/// assert_eq!(ram.read(0x5FFF), None);
/// ```
pub struct RamDevice {
    base: u16,
    data: Vec<u8>,
}

impl RamDevice {
    /// Creates a zero-filled RAM window of `size` bytes starting at `base`.
    ///
    /// The window is clipped at 0xFFFF.
    pub fn new(base: u16, size: u16) -> Self {
        let size = (size as usize).min(0x10000 - base as usize);
        Self {
            base,
            data: vec![0; size],
        }
    }

    /// Copies `bytes` into the window starting at absolute address `addr`.
    pub fn load_bytes(&mut self, addr: u16, bytes: &[u8]) -> Result<(), EmulatorError> {
        let out_of_bounds = EmulatorError::LoadOutOfBounds {
            start: addr,
            len: bytes.len(),
        };
        let start = self.offset(addr).ok_or_else(|| out_of_bounds.clone())?;
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(out_of_bounds);
        }

        self.data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// The window's contents.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// First address of the window.
    pub fn base(&self) -> u16 {
        self.base
    }

    fn offset(&self, addr: u16) -> Option<usize> {
        let offset = addr.checked_sub(self.base)? as usize;
        (offset < self.data.len()).then_some(offset)
    }
}

impl Device for RamDevice {
    fn read(&mut self, addr: u16) -> Option<u8> {
        self.offset(addr).map(|offset| self.data[offset])
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(offset) = self.offset(addr) {
            self.data[offset] = value;
        }
    }
}

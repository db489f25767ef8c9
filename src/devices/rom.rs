//! ROM device implementation.
//!
//! A read-only program image mapped from a base address to the top of memory,
//! optionally with a pattern-table image served on the video channel.

use super::Device;

/// Pattern tables occupy 0x0000-0x1FFF of the video address space.
const CHR_WINDOW_END: u16 = 0x2000;

/// Read-only memory mapped at `base..=0xFFFF`.
///
/// An image shorter than the window is mirrored to fill it, so a 16 KiB program at
/// 0x8000 is also visible at 0xC000 (where the CPU vectors live). Writes are
/// ignored.
///
/// # Examples
///
/// ```rust
/// use nes6502::{Device, RomDevice};
///
/// let mut image = vec![0; 0x4000];
/// image[0x3FFC] = 0x00; // Reset vector low byte
/// image[0x3FFD] = 0x80; // Reset vector high byte
///
/// let mut rom = RomDevice::new(0x8000, image);
/// assert_eq!(rom.read(0xFFFD), Some(0x80));
///
/// rom.write(0xFFFD, 0xFF);
/// assert_eq!(rom.read(0xFFFD), Some(0x80));
/// ```
pub struct RomDevice {
    base: u16,
    data: Vec<u8>,
    chr: Vec<u8>,
}

impl RomDevice {
    /// Creates a ROM window starting at `base`.
    pub fn new(base: u16, data: Vec<u8>) -> Self {
        Self {
            base,
            data,
            chr: Vec::new(),
        }
    }

    /// Adds a pattern-table image served on the video channel at 0x0000-0x1FFF.
    pub fn with_chr(mut self, chr: Vec<u8>) -> Self {
        self.chr = chr;
        self
    }

    /// Size of the program image in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the program image is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Device for RomDevice {
    fn read(&mut self, addr: u16) -> Option<u8> {
        if self.data.is_empty() {
            return None;
        }
        let offset = addr.checked_sub(self.base)? as usize;
        Some(self.data[offset % self.data.len()])
    }

    fn write(&mut self, _addr: u16, _value: u8) {}

    fn ppu_read(&mut self, addr: u16) -> Option<u8> {
        if addr >= CHR_WINDOW_END || self.chr.is_empty() {
            return None;
        }
        Some(self.chr[addr as usize % self.chr.len()])
    }
}

//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from a specific
//! memory implementation. Two implementations ship with the crate:
//!
//! - `Bus`: the NES-style bus with mirrored internal RAM and peripheral interceptors
//! - `FlatMemory`: 64 KiB of plain RAM, used to test the CPU in isolation
//!
//! ## Design Principles
//!
//! The MemoryBus trait follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - Unmapped reads return whatever the bus last carried (open bus)
//! - Writes to ROM/unmapped regions are ignored
//! - Reads take `&mut self`: reading a peripheral register can have side effects
//!   and the bus latches every address it sees

/// Memory bus trait for CPU to read/write bytes.
///
/// # Examples
///
/// ```
/// use nes6502::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// Must never panic. Unmapped addresses return an implementation-defined
    /// but deterministic value.
    fn read(&mut self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// Must never panic. Read-only or unmapped addresses ignore the write.
    fn write(&mut self, addr: u16, value: u8);

    /// Checks if the shared, level-sensitive IRQ line is asserted.
    ///
    /// The CPU polls this after every instruction. Defaults to `false` for
    /// memories without interrupt-capable devices.
    fn irq_active(&self) -> bool {
        false
    }
}

/// Simple 64KB flat memory implementation.
///
/// Every address (0x0000-0xFFFF) is writable RAM initialized to 0x00. There is no
/// mirroring and no peripheral dispatch, which makes it the convenient backend for
/// exercising instruction semantics.
///
/// # Examples
///
/// ```
/// use nes6502::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Reset vector low byte
/// memory.write(0xFFFD, 0x80); // Reset vector high byte (PC = 0x8000)
///
/// let mut cpu = Cpu::new(memory);
/// cpu.boot();
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at 0xFFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            let addr = start.wrapping_add(i as u16);
            self.data[addr as usize] = byte;
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

//! # System Bus
//!
//! Central address/data router between the CPU and everything else.
//!
//! ## Address Routing
//!
//! - `0x0000-0x1FFF`: internal RAM, 2 KiB mirrored every 0x0800 bytes. Never
//!   forwarded to peripherals.
//! - `0x2000-0xFFFF`: dispatched through the interceptor chains.
//!   - Reads walk the read chain in registration order; the first interceptor that
//!     returns `Some` wins and later interceptors are not called. If nobody answers,
//!     the read returns the data latch (open bus).
//!   - Writes are broadcast to every write interceptor in registration order. Each
//!     interceptor ignores addresses it does not own.
//!
//! A third chain serves the video unit's address space. It never sees CPU traffic.
//!
//! Interceptors are registered during setup, before the bus is handed to the CPU
//! thread; there is no de-registration.

use crate::devices::{Device, SharedDevice};
use crate::{EmulatorError, MemoryBus};

/// First address that is not internal RAM.
pub const RAM_MIRROR_END: u16 = 0x2000;

/// Size of the physical internal RAM; `0x0000-0x1FFF` mirrors it.
pub const RAM_SIZE: u16 = 0x0800;

/// A read interceptor claims an address by returning `Some(byte)`.
///
/// Implemented for any `FnMut(u16) -> Option<u8> + Send` closure.
pub trait ReadInterceptor: Send {
    /// Returns the byte at `addr`, or `None` if the address is not handled.
    fn read(&mut self, addr: u16) -> Option<u8>;
}

impl<F> ReadInterceptor for F
where
    F: FnMut(u16) -> Option<u8> + Send,
{
    fn read(&mut self, addr: u16) -> Option<u8> {
        self(addr)
    }
}

/// A write interceptor receives every write at or above 0x2000.
///
/// Implemented for any `FnMut(u16, u8) + Send` closure.
pub trait WriteInterceptor: Send {
    /// Handles a write; must be a no-op for addresses the interceptor does not own.
    fn write(&mut self, addr: u16, value: u8);
}

impl<F> WriteInterceptor for F
where
    F: FnMut(u16, u8) + Send,
{
    fn write(&mut self, addr: u16, value: u8) {
        self(addr, value)
    }
}

/// Source polled for the shared IRQ line.
trait IrqSource: Send {
    fn asserted(&self) -> bool;
}

impl<D: Device + Send> IrqSource for SharedDevice<D> {
    fn asserted(&self) -> bool {
        self.with(|device| device.has_interrupt())
    }
}

/// The CPU-visible bus.
///
/// # Examples
///
/// ```rust
/// use nes6502::{Bus, MemoryBus};
///
/// let mut bus = Bus::new();
///
/// // Internal RAM is mirrored every 2 KiB
/// bus.write(0x0812, 0xAB);
/// assert_eq!(bus.read(0x0012), 0xAB);
/// assert_eq!(bus.read(0x1012), 0xAB);
///
/// // A peripheral claiming 0x3000
/// bus.register_read(|addr| if addr == 0x3000 { Some(0x10) } else { None });
/// assert_eq!(bus.read(0x3000), 0x10);
/// ```
pub struct Bus {
    /// Backing store; CPU-visible RAM is the first 2 KiB
    ram: Box<[u8; 0x10000]>,
    address_latch: u16,
    data_latch: u8,
    ppu_data_latch: u8,
    reads: Vec<Box<dyn ReadInterceptor>>,
    writes: Vec<Box<dyn WriteInterceptor>>,
    ppu_reads: Vec<Box<dyn ReadInterceptor>>,
    irq_sources: Vec<Box<dyn IrqSource>>,
}

impl Bus {
    /// Creates a bus with zeroed RAM and no peripherals.
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
            address_latch: 0,
            data_latch: 0,
            ppu_data_latch: 0,
            reads: Vec::new(),
            writes: Vec::new(),
            ppu_reads: Vec::new(),
            irq_sources: Vec::new(),
        }
    }

    /// Appends a read interceptor. Earlier registrations take priority.
    pub fn register_read<R: ReadInterceptor + 'static>(&mut self, interceptor: R) {
        self.reads.push(Box::new(interceptor));
        log::debug!("bus: {} read interceptor(s) registered", self.reads.len());
    }

    /// Appends a write interceptor. All write interceptors see every write.
    pub fn register_write<W: WriteInterceptor + 'static>(&mut self, interceptor: W) {
        self.writes.push(Box::new(interceptor));
        log::debug!("bus: {} write interceptor(s) registered", self.writes.len());
    }

    /// Appends an interceptor on the video unit's read channel.
    pub fn register_ppu_read<R: ReadInterceptor + 'static>(&mut self, interceptor: R) {
        self.ppu_reads.push(Box::new(interceptor));
        log::debug!(
            "bus: {} PPU read interceptor(s) registered",
            self.ppu_reads.len()
        );
    }

    /// Registers a device on the read, write, PPU-read and IRQ chains at once.
    ///
    /// Returns a handle to the shared device so the caller can inspect it later.
    ///
    /// ```rust
    /// use nes6502::{Bus, MemoryBus, RamDevice};
    ///
    /// let mut bus = Bus::new();
    /// let wram = bus.attach(RamDevice::new(0x6000, 0x2000));
    ///
    /// bus.write(0x6004, 0x41);
    /// assert_eq!(wram.with(|ram| ram.bytes()[4]), 0x41);
    /// ```
    pub fn attach<D: Device + Send + 'static>(&mut self, device: D) -> SharedDevice<D> {
        let shared = SharedDevice::new(device);
        self.register_read(shared.clone());
        self.register_write(shared.clone());
        self.register_ppu_read(PpuChannel(shared.clone()));
        self.irq_sources.push(Box::new(shared.clone()));
        shared
    }

    /// Copies `data` into RAM starting at `start`.
    ///
    /// Addresses below 0x2000 fold onto the mirrored 2 KiB; higher addresses land in
    /// the backing store, which the CPU only sees through interceptors. Use
    /// `peek` to inspect it.
    pub fn load(&mut self, start: u16, data: &[u8]) -> Result<(), EmulatorError> {
        if start as usize + data.len() > 0x10000 {
            return Err(EmulatorError::LoadOutOfBounds {
                start,
                len: data.len(),
            });
        }

        for (i, &byte) in data.iter().enumerate() {
            let addr = start + i as u16;
            self.ram[Self::ram_index(addr)] = byte;
        }
        Ok(())
    }

    /// Reads the backing store without touching latches or interceptors.
    pub fn peek(&self, addr: u16) -> u8 {
        self.ram[Self::ram_index(addr)]
    }

    /// Reads from the video unit's address space.
    ///
    /// First responder wins; a miss returns the last value seen on this channel.
    pub fn ppu_read(&mut self, addr: u16) -> u8 {
        if let Some(value) = self.ppu_reads.iter_mut().find_map(|r| r.read(addr)) {
            self.ppu_data_latch = value;
        }
        self.ppu_data_latch
    }

    /// Last address placed on the bus.
    pub fn address_latch(&self) -> u16 {
        self.address_latch
    }

    /// Last byte carried by the bus.
    pub fn data_latch(&self) -> u8 {
        self.data_latch
    }

    /// Internal RAM (the physical 2 KiB).
    pub fn ram(&self) -> &[u8] {
        &self.ram[..RAM_SIZE as usize]
    }

    fn ram_index(addr: u16) -> usize {
        if addr < RAM_MIRROR_END {
            (addr % RAM_SIZE) as usize
        } else {
            addr as usize
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        self.address_latch = addr;

        if addr < RAM_MIRROR_END {
            self.data_latch = self.ram[Self::ram_index(addr)];
            return self.data_latch;
        }

        match self.reads.iter_mut().find_map(|r| r.read(addr)) {
            Some(value) => self.data_latch = value,
            None => log::trace!(
                "bus: open bus read at 0x{:04X} -> 0x{:02X}",
                addr,
                self.data_latch
            ),
        }
        self.data_latch
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.address_latch = addr;
        self.data_latch = value;

        if addr < RAM_MIRROR_END {
            self.ram[Self::ram_index(addr)] = value;
            return;
        }

        for interceptor in &mut self.writes {
            interceptor.write(addr, value);
        }
    }

    fn irq_active(&self) -> bool {
        self.irq_sources.iter().any(|source| source.asserted())
    }
}

/// Adapter routing a shared device's `ppu_read` onto the PPU chain.
struct PpuChannel<D>(SharedDevice<D>);

impl<D: Device + Send> ReadInterceptor for PpuChannel<D> {
    fn read(&mut self, addr: u16) -> Option<u8> {
        self.0.with_mut(|device| device.ppu_read(addr))
    }
}

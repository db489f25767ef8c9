//! # NES-style 6502 Emulator Core
//!
//! A cycle-gated NMOS 6502 CPU together with the memory-mapped bus it talks to.
//!
//! The crate is organised the way the hardware is wired:
//!
//! - `bus` - 2 KiB mirrored internal RAM plus ordered read/write interceptor chains
//!   that peripherals (cartridge, video unit) register on
//! - `clock` / `gate` - a fixed-rate tick source and the countdown that paces the
//!   CPU to emulated cycles
//! - `opcodes` - the 16x16 opcode matrix (instruction, addressing mode, base cycles)
//! - `addressing` - operand resolution for every addressing mode
//! - `cpu` - registers, fetch-decode-execute, interrupts
//! - `system` - the clock thread and CPU thread wired together
//!
//! ## Quick Start
//!
//! ```rust
//! use nes6502::{Bus, Cpu, RomDevice};
//!
//! // 16 KiB program image: LDA #$42 at $8000, reset vector -> $8000
//! let mut image = vec![0xEA; 0x4000];
//! image[0x0000] = 0xA9;
//! image[0x0001] = 0x42;
//! image[0x3FFC] = 0x00;
//! image[0x3FFD] = 0x80;
//!
//! let mut bus = Bus::new();
//! bus.attach(RomDevice::new(0x8000, image));
//!
//! let mut cpu = Cpu::new(bus);
//! cpu.boot();
//! assert_eq!(cpu.pc(), 0x8000);
//!
//! let cycles = cpu.step();
//! assert_eq!(cycles, 2);
//! assert_eq!(cpu.a(), 0x42);
//! ```
//!
//! ## Timing
//!
//! `Cpu::step` and `Cpu::run_for_cycles` run in virtual time and are what tests use.
//! `Cpu::run` waits on a `CycleGate` between instructions; the gate is counted down
//! by a `Clock` running on its own thread (see `System`).

pub mod addressing;
pub mod bus;
pub mod clock;
pub mod cpu;
pub mod devices;
pub mod gate;
pub mod memory;
pub mod opcodes;
pub mod system;
pub mod test_rom;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use addressing::{AddressingMode, IndexRegister, Operand, OperandLocation};
pub use bus::{Bus, ReadInterceptor, WriteInterceptor};
pub use clock::{Clock, ClockConfig};
pub use cpu::Cpu;
pub use devices::{Device, RamDevice, RomDevice, SharedDevice};
pub use gate::CycleGate;
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{decode, Instruction, OpcodeEntry, OPCODE_MATRIX};
pub use system::{Pacing, PowerSwitch, RunningSystem, Stopped, System, SystemConfig};
pub use test_rom::{TestReport, TestStatus};

/// Errors surfaced by the emulator's setup and threading layers.
///
/// Instruction execution itself never fails: unmapped addresses behave as open bus
/// and register arithmetic wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    /// A `Bus::load` would write past address 0xFFFF.
    LoadOutOfBounds {
        /// First address of the load
        start: u16,
        /// Number of bytes requested
        len: usize,
    },

    /// Clock configuration cannot produce a usable tick interval.
    InvalidClockConfig(&'static str),

    /// The OS refused to spawn a worker thread.
    ThreadSpawn(String),

    /// A worker thread panicked; contains the thread name.
    ThreadPanicked(&'static str),
}

impl std::fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EmulatorError::LoadOutOfBounds { start, len } => {
                write!(
                    f,
                    "Load of {} bytes at 0x{:04X} runs past the end of the address space",
                    len, start
                )
            }
            EmulatorError::InvalidClockConfig(reason) => {
                write!(f, "Invalid clock configuration: {}", reason)
            }
            EmulatorError::ThreadSpawn(reason) => {
                write!(f, "Failed to spawn emulator thread: {}", reason)
            }
            EmulatorError::ThreadPanicked(name) => write!(f, "Thread '{}' panicked", name),
        }
    }
}

impl std::error::Error for EmulatorError {}

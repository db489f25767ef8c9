//! WASM API for the emulator.
//!
//! Wraps a `Cpu<Bus>` for JavaScript callers: cartridge and RAM loading, virtual
//! time execution, and state inspection. Real-time pacing is left to the host's
//! animation loop (call `run_for_cycles` once per frame).

use crate::{Bus, Cpu, EmulatorError, MemoryBus, RamDevice, RomDevice, SharedDevice};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<EmulatorError> for JsError {
    fn from(err: EmulatorError) -> Self {
        JsError::new(&err.to_string())
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct Emulator {
    cpu: Cpu<Bus>,
    work_ram: SharedDevice<RamDevice>,
}

#[wasm_bindgen]
impl Emulator {
    /// Creates an emulator with 8 KiB of cartridge work RAM at 0x6000 and no
    /// program loaded.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let mut bus = Bus::new();
        let work_ram = bus.attach(RamDevice::new(0x6000, 0x2000));

        Emulator {
            cpu: Cpu::new(bus),
            work_ram,
        }
    }

    /// Maps a program image at `base`, mirrored up to 0xFFFF.
    ///
    /// Images registered later are only consulted for addresses earlier ones
    /// do not claim.
    pub fn load_rom(&mut self, base: u16, image: &[u8]) -> Result<(), JsError> {
        if base < 0x2000 {
            return Err(EmulatorError::LoadOutOfBounds {
                start: base,
                len: image.len(),
            }
            .into());
        }
        self.cpu
            .memory_mut()
            .attach(RomDevice::new(base, image.to_vec()));
        Ok(())
    }

    /// Copies bytes into internal RAM (below 0x2000) or cartridge work RAM.
    pub fn load_ram(&mut self, addr: u16, bytes: &[u8]) -> Result<(), JsError> {
        if addr >= 0x2000 {
            self.work_ram
                .with_mut(|ram| ram.load_bytes(addr, bytes))
                .map_err(JsError::from)
        } else {
            self.cpu.memory_mut().load(addr, bytes).map_err(JsError::from)
        }
    }

    /// Loads PC from the reset vector.
    pub fn boot(&mut self) {
        self.cpu.boot();
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Executes one instruction and returns its cycle count.
    pub fn step(&mut self) -> u32 {
        self.cpu.step()
    }

    /// Runs for at least `cycles` cycles and returns the cycles consumed.
    pub fn run_for_cycles(&mut self, cycles: u32) -> u32 {
        self.cpu.run_for_cycles(cycles as u64) as u32
    }

    /// Latches a non-maskable interrupt.
    pub fn nmi(&mut self) {
        self.cpu.nmi();
    }

    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.cpu.x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.cpu.y()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.cpu.status()
    }

    /// Total cycles, as f64 since JavaScript numbers cannot hold a full u64.
    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.cpu.cycles() as f64
    }

    /// Reads memory through the bus (interceptors included).
    pub fn peek(&mut self, addr: u16) -> u8 {
        self.cpu.memory_mut().read(addr)
    }

    /// A copy of the 2 KiB internal RAM.
    pub fn ram(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.cpu.memory().ram())
    }

    /// A copy of cartridge work RAM (0x6000-0x7FFF).
    pub fn work_ram(&self) -> js_sys::Uint8Array {
        self.work_ram
            .with(|ram| js_sys::Uint8Array::from(ram.bytes()))
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

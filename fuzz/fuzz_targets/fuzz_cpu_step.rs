//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary register file and RAM image behind the real bus, then
//! executes a short burst of instructions and checks the invariants that must
//! hold for any input.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nes6502::{decode, Bus, Cpu, MemoryBus, RomDevice};

/// Arbitrary CPU initial state
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
    nmi: bool,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    /// Internal RAM contents (zero page and stack included)
    ram: [u8; 0x800],
    /// Program bytes mapped at 0x8000
    program: [u8; 64],
    /// Instructions to execute
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut image = vec![0xEA; 0x4000];
    image[..input.program.len()].copy_from_slice(&input.program);
    // Reset and IRQ vectors both point at the program
    image[0x3FFA..].copy_from_slice(&[0x00, 0x80, 0x00, 0x80, 0x00, 0x80]);

    let mut bus = Bus::new();
    bus.attach(RomDevice::new(0x8000, image));
    if bus.load(0x0000, &input.ram).is_err() {
        return;
    }

    let mut cpu = Cpu::new(bus);
    cpu.boot();

    let state = &input.cpu_state;
    cpu.set_a(state.a);
    cpu.set_x(state.x);
    cpu.set_y(state.y);
    cpu.set_sp(state.sp);
    cpu.set_status(state.status);
    if state.nmi {
        cpu.nmi();
    }

    for _ in 0..input.steps % 32 {
        let pc = cpu.pc();
        let opcode = cpu.memory_mut().read(pc);
        let base = decode(opcode).base_cycles as u32;
        let before = cpu.cycles();

        let cycles = cpu.step();

        // Page/branch penalties add at most 2, an interrupt entry 7
        assert!(cycles >= base && cycles <= base + 2 + 7);
        assert_eq!(cpu.cycles(), before + cycles as u64);
        // Break and unused bits never live in P
        assert_eq!(cpu.status() & 0x30, 0);
    }
});

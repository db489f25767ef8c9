//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to check arithmetic, compare and stack semantics
//! against reference formulas across the whole input space, and that the bus
//! mirrors RAM for every address.

use nes6502::{decode, Bus, Cpu, FlatMemory, MemoryBus};
use proptest::prelude::*;

/// Helper function to create a booted CPU with reset vector at 0x8000
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    let mut cpu = Cpu::new(memory);
    cpu.boot();
    cpu
}

/// NOP plus every undocumented slot that decodes as one
fn nop_opcodes() -> Vec<u8> {
    (0..=255u8)
        .filter(|&op| op == 0xEA || decode(op).is_filler())
        .collect()
}

fn run_immediate(opcode: u8, a: u8, operand: u8, carry: bool) -> Cpu<FlatMemory> {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[opcode, operand]);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    cpu.step();
    cpu
}

proptest! {
    #[test]
    fn prop_adc_matches_signed_and_unsigned_sums(a: u8, m: u8, carry: bool) {
        let cpu = run_immediate(0x69, a, m, carry);

        let unsigned = a as u16 + m as u16 + carry as u16;
        let signed = a as i8 as i16 + m as i8 as i16 + carry as i16;

        prop_assert_eq!(cpu.a(), unsigned as u8);
        prop_assert_eq!(cpu.flag_c(), unsigned > 0xFF);
        prop_assert_eq!(cpu.flag_v(), !(-128..=127).contains(&signed));
        prop_assert_eq!(cpu.flag_z(), unsigned as u8 == 0);
        prop_assert_eq!(cpu.flag_n(), unsigned as u8 & 0x80 != 0);
    }

    #[test]
    fn prop_sbc_matches_signed_and_unsigned_differences(a: u8, m: u8, carry: bool) {
        let cpu = run_immediate(0xE9, a, m, carry);

        let borrow = !carry as i16;
        let unsigned = a as i16 - m as i16 - borrow;
        let signed = a as i8 as i16 - m as i8 as i16 - borrow;

        prop_assert_eq!(cpu.a(), unsigned as u8);
        prop_assert_eq!(cpu.flag_c(), unsigned >= 0);
        prop_assert_eq!(cpu.flag_v(), !(-128..=127).contains(&signed));
    }

    #[test]
    fn prop_cmp_flags(a: u8, m: u8) {
        let cpu = run_immediate(0xC9, a, m, false);

        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.flag_c(), a >= m);
        prop_assert_eq!(cpu.flag_z(), a == m);
        prop_assert_eq!(cpu.flag_n(), a.wrapping_sub(m) & 0x80 != 0);
    }

    #[test]
    fn prop_pha_pla_round_trip_any_sp(value: u8, sp: u8) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[0x48, 0xA9, 0x00, 0x68]); // PHA; LDA #0; PLA
        cpu.set_sp(sp);
        cpu.set_a(value);

        cpu.step();
        prop_assert_eq!(cpu.sp(), sp.wrapping_sub(1));
        cpu.step();
        cpu.step();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.sp(), sp);
    }

    #[test]
    fn prop_jsr_rts_restores_sp(target in 0x0200u16..0x7FFF, sp: u8) {
        let mut cpu = setup_cpu();
        let [lo, hi] = target.to_le_bytes();
        cpu.memory_mut().load(0x8000, &[0x20, lo, hi]);
        cpu.memory_mut().write(target, 0x60);
        cpu.set_sp(sp);

        cpu.step();
        prop_assert_eq!(cpu.pc(), target);
        cpu.step();

        prop_assert_eq!(cpu.pc(), 0x8003);
        prop_assert_eq!(cpu.sp(), sp);
    }

    #[test]
    fn prop_bus_mirrors_internal_ram(addr in 0x0000u16..0x2000, value: u8) {
        let mut bus = Bus::new();
        bus.write(addr, value);

        let base = addr % 0x0800;
        for mirror in 0..4u16 {
            prop_assert_eq!(bus.read(base + mirror * 0x0800), value);
        }
    }

    #[test]
    fn prop_nop_never_mutates_state(
        opcode in prop::sample::select(nop_opcodes()),
        a: u8,
        x: u8,
        y: u8,
        sp: u8,
        status: u8,
        following: [u8; 2],
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, following[0], following[1]]);
        cpu.set_a(a);
        cpu.set_x(x);
        cpu.set_y(y);
        cpu.set_sp(sp);
        cpu.set_status(status);
        let before = cpu.status();

        let cycles = cpu.step();

        prop_assert_eq!(cycles, 2);
        prop_assert_eq!(cpu.pc(), 0x8001);
        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.x(), x);
        prop_assert_eq!(cpu.y(), y);
        prop_assert_eq!(cpu.sp(), sp);
        prop_assert_eq!(cpu.status(), before);
    }

    #[test]
    fn prop_step_cycles_within_documented_range(opcode: u8, operand: [u8; 2], x: u8, y: u8) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, operand[0], operand[1]]);
        cpu.set_x(x);
        cpu.set_y(y);

        let base = decode(opcode).base_cycles as u32;
        let cycles = cpu.step();

        // Page and branch penalties add at most two cycles
        prop_assert!(cycles >= base && cycles <= base + 2, "opcode {:02X}: {} cycles", opcode, cycles);
        prop_assert_eq!(cpu.cycles(), cycles as u64);
    }
}

//! Tests for JMP, JSR, RTS, BRK and RTI.

use nes6502::{Cpu, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);
    let mut cpu = Cpu::new(memory);
    cpu.boot();
    cpu
}

// ========== JMP ==========

#[test]
fn test_jmp_absolute() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x4C, 0x34, 0x12]);

    assert_eq!(cpu.step(), 3);
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_jmp_indirect() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x6C, 0x00, 0x02]);
    cpu.memory_mut().load(0x0200, &[0xCD, 0xAB]);

    assert_eq!(cpu.step(), 5);
    assert_eq!(cpu.pc(), 0xABCD);
}

#[test]
fn test_jmp_indirect_page_boundary_bug() {
    let mut cpu = setup_cpu();

    // JMP ($02FF) takes the high byte from 0x0200, not 0x0300
    cpu.memory_mut().load(0x8000, &[0x6C, 0xFF, 0x02]);
    cpu.memory_mut().write(0x02FF, 0x34);
    cpu.memory_mut().write(0x0200, 0x12);
    cpu.memory_mut().write(0x0300, 0x99);

    cpu.step();
    assert_eq!(cpu.pc(), 0x1234);
}

// ========== JSR / RTS ==========

#[test]
fn test_jsr_pushes_return_address_minus_one() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x20, 0x34, 0x12]);

    assert_eq!(cpu.step(), 6);
    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.sp(), 0xFD);

    // 0x8002 pushed high byte first
    assert_eq!(cpu.memory_mut().read(0x01FF), 0x80);
    assert_eq!(cpu.memory_mut().read(0x01FE), 0x02);
}

#[test]
fn test_jsr_rts_round_trip() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x20, 0x34, 0x12]);
    cpu.memory_mut().write(0x1234, 0x60); // RTS
    let sp_before = cpu.sp();

    cpu.step();
    assert_eq!(cpu.step(), 6);

    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), sp_before);
}

#[test]
fn test_nested_subroutines() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
    cpu.memory_mut().load(0x9000, &[0x20, 0x00, 0xA0, 0x60]); // JSR $A000; RTS
    cpu.memory_mut().write(0xA000, 0x60); // RTS

    for _ in 0..4 {
        cpu.step();
    }

    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0xFF);
}

// ========== BRK / RTI ==========

#[test]
fn test_brk_enters_handler() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x00, 0xFF]);
    cpu.set_flag_c(true);
    cpu.set_flag_i(false);

    assert_eq!(cpu.step(), 7);
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.flag_i());
    assert_eq!(cpu.sp(), 0xFC);

    // Return address skips the padding byte
    assert_eq!(cpu.memory_mut().read(0x01FF), 0x80);
    assert_eq!(cpu.memory_mut().read(0x01FE), 0x02);

    // Pushed status carries Break and the unused bit
    let pushed = cpu.memory_mut().read(0x01FD);
    assert_eq!(pushed, 0x30 | 0x01);
}

#[test]
fn test_brk_rti_round_trip() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x00, 0xFF, 0xEA]);
    cpu.memory_mut().write(0x9000, 0x40); // RTI
    cpu.set_flag_i(false);
    cpu.set_flag_n(true);

    cpu.step();
    assert_eq!(cpu.step(), 6);

    assert_eq!(cpu.pc(), 0x8002);
    assert_eq!(cpu.sp(), 0xFF);
    assert!(!cpu.flag_i());
    assert!(cpu.flag_n());
    // Break and unused bits do not survive the pull
    assert_eq!(cpu.status() & 0x30, 0);
}

#[test]
fn test_rti_uses_pulled_pc_unchanged() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x40); // RTI
    cpu.set_sp(0xFC);
    cpu.memory_mut().load(0x01FD, &[0xC3, 0x34, 0x12]);

    cpu.step();

    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.status(), 0xC3);
    assert_eq!(cpu.sp(), 0xFF);
}

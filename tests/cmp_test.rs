//! Tests for CMP, CPX and CPY.

use nes6502::{Cpu, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    let mut cpu = Cpu::new(memory);
    cpu.boot();
    cpu
}

fn flags(cpu: &Cpu<FlatMemory>) -> (bool, bool, bool) {
    (cpu.flag_c(), cpu.flag_z(), cpu.flag_n())
}

#[test]
fn test_cmp_greater() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xC9, 0x10]);
    cpu.set_a(0x20);

    assert_eq!(cpu.step(), 2);
    assert_eq!(flags(&cpu), (true, false, false));
    assert_eq!(cpu.a(), 0x20);
}

#[test]
fn test_cmp_equal() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xC9, 0x42]);
    cpu.set_a(0x42);

    cpu.step();
    assert_eq!(flags(&cpu), (true, true, false));
}

#[test]
fn test_cmp_less() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xC9, 0x02]);
    cpu.set_a(0x01);

    // 0x01 - 0x02 = 0xFF
    cpu.step();
    assert_eq!(flags(&cpu), (false, false, true));
}

#[test]
fn test_cmp_is_unsigned() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xC9, 0x01]);
    cpu.set_a(0x80);

    // 0x80 - 0x01 = 0x7F, no borrow
    cpu.step();
    assert_eq!(flags(&cpu), (true, false, false));
}

#[test]
fn test_cpx_immediate() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xE0, 0x05]);
    cpu.set_x(0x05);

    assert_eq!(cpu.step(), 2);
    assert_eq!(flags(&cpu), (true, true, false));
    assert_eq!(cpu.x(), 0x05);
}

#[test]
fn test_cpy_zero_page() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xC4, 0x20]);
    cpu.memory_mut().write(0x0020, 0x90);
    cpu.set_y(0x10);

    // 0x10 - 0x90 = 0x80
    assert_eq!(cpu.step(), 3);
    assert_eq!(flags(&cpu), (false, false, true));
}

#[test]
fn test_cmp_absolute_x_page_cross_penalty() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0xDD, 0xFF, 0x20]);
    cpu.memory_mut().write(0x2100, 0x10);
    cpu.set_x(0x01);
    cpu.set_a(0x10);

    assert_eq!(cpu.step(), 5);
    assert!(cpu.flag_z());
}

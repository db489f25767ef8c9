//! Tests for NOP and the undocumented opcode slots.

use nes6502::{decode, Cpu, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    let mut cpu = Cpu::new(memory);
    cpu.boot();
    cpu
}

#[test]
fn test_nop() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0xEA);
    let status = cpu.status();

    assert_eq!(cpu.step(), 2);
    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.status(), status);
}

#[test]
fn test_every_undocumented_opcode_is_a_one_byte_nop() {
    for opcode in 0..=255u8 {
        if !decode(opcode).is_filler() {
            continue;
        }

        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, 0xA9, 0x42]);
        cpu.set_a(0x11);
        let status = cpu.status();

        assert_eq!(cpu.step(), 2, "opcode {:02X}", opcode);
        assert_eq!(cpu.pc(), 0x8001, "opcode {:02X}", opcode);
        assert_eq!(cpu.a(), 0x11, "opcode {:02X}", opcode);
        assert_eq!(cpu.status(), status, "opcode {:02X}", opcode);
        assert_eq!(cpu.sp(), 0xFF, "opcode {:02X}", opcode);
    }
}

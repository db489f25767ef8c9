//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC, SBC: binary add/subtract with carry
//! - AND, ORA, EOR: bitwise logic into the accumulator
//! - CMP, CPX, CPY: register compares
//! - BIT: bit test
//!
//! The decimal flag is stored but never consulted; arithmetic is always binary.

use crate::addressing::{Operand, OperandLocation};
use crate::{Cpu, MemoryBus};

/// Adds `value` and the carry into the accumulator, setting N, V, Z and C.
fn add_with_carry<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) {
    let a = cpu.a;
    let carry_in = cpu.flag_c as u16;

    let result16 = a as u16 + value as u16 + carry_in;
    let result = result16 as u8;

    cpu.flag_c = result16 > 0xFF;
    // Both inputs share a sign that the result lacks
    cpu.flag_v = (a ^ result) & (value ^ result) & 0x80 != 0;
    cpu.a = result;
    cpu.set_nz(result);
}

/// Executes the ADC (Add with Carry) instruction.
///
/// A = A + M + C. Flags: N, V, Z, C.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    add_with_carry(cpu, value);
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// A = A - M - (1 - C), computed as A + !M + C. C ends up set when no borrow
/// occurred.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    add_with_carry(cpu, !value);
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    cpu.a &= value;
    cpu.set_nz(cpu.a);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    cpu.a |= value;
    cpu.set_nz(cpu.a);
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    cpu.a ^= value;
    cpu.set_nz(cpu.a);
}

/// Executes CMP, CPX or CPY: compares `register` against the operand.
///
/// Flags:
/// - C: register >= M (unsigned)
/// - Z: register == M
/// - N: bit 7 of (register - M)
///
/// The register itself is left untouched.
pub(crate) fn execute_compare<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    operand: Operand,
    register: OperandLocation,
) {
    let register = cpu.load(register);
    let value = cpu.load(operand.location);
    let result = register.wrapping_sub(value);

    cpu.flag_c = register >= value;
    cpu.set_nz(result);
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z is set from A & M; N and V are copied from bits 7 and 6 of M. A is not
/// modified.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);

    cpu.flag_z = cpu.a & value == 0;
    cpu.flag_n = value & 0x80 != 0;
    cpu.flag_v = value & 0x40 != 0;
}

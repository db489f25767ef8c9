//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL, ROR on the accumulator or memory. The bit shifted out lands in
//! C; N and Z follow the result. Memory forms write the result back through the
//! bus.

use crate::addressing::Operand;
use crate::{Cpu, MemoryBus};

/// Applies `shift` to the operand. `shift` gets the value and the incoming carry
/// and returns the result and the outgoing carry.
fn shift_operand<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    operand: Operand,
    shift: impl FnOnce(u8, bool) -> (u8, bool),
) {
    let value = cpu.load(operand.location);
    let (result, carry) = shift(value, cpu.flag_c);

    cpu.store(operand.location, result);
    cpu.flag_c = carry;
    cpu.set_nz(result);
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    shift_operand(cpu, operand, |v, _| (v << 1, v & 0x80 != 0));
}

/// Executes the LSR (Logical Shift Right) instruction. N is always cleared.
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    shift_operand(cpu, operand, |v, _| (v >> 1, v & 0x01 != 0));
}

/// Executes the ROL (Rotate Left) instruction. Old C enters bit 0.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    shift_operand(cpu, operand, |v, c| ((v << 1) | c as u8, v & 0x80 != 0));
}

/// Executes the ROR (Rotate Right) instruction. Old C enters bit 7.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    shift_operand(cpu, operand, |v, c| ((v >> 1) | ((c as u8) << 7), v & 0x01 != 0));
}

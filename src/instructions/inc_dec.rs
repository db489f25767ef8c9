//! # Increment/Decrement Instructions
//!
//! INC and DEC are read-modify-write on memory; INX, INY, DEX, DEY act on the
//! index registers. All wrap and set N and Z from the result.

use crate::addressing::{IndexRegister, Operand, OperandLocation};
use crate::{Cpu, MemoryBus};

fn modify<M: MemoryBus>(cpu: &mut Cpu<M>, location: OperandLocation, f: impl FnOnce(u8) -> u8) {
    let result = f(cpu.load(location));
    cpu.store(location, result);
    cpu.set_nz(result);
}

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    modify(cpu, operand.location, |v| v.wrapping_add(1));
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    modify(cpu, operand.location, |v| v.wrapping_sub(1));
}

/// Executes INX or INY.
pub(crate) fn execute_inc_register<M: MemoryBus>(cpu: &mut Cpu<M>, register: IndexRegister) {
    modify(cpu, OperandLocation::Register(register), |v| v.wrapping_add(1));
}

/// Executes DEX or DEY.
pub(crate) fn execute_dec_register<M: MemoryBus>(cpu: &mut Cpu<M>, register: IndexRegister) {
    modify(cpu, OperandLocation::Register(register), |v| v.wrapping_sub(1));
}

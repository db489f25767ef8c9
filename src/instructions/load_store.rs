//! # Load and Store Instructions
//!
//! LDA, LDX, LDY copy the operand into a register and set N and Z. STA, STX, STY
//! write a register to memory and leave the flags alone.

use crate::addressing::{Operand, OperandLocation};
use crate::{Cpu, MemoryBus};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    cpu.a = value;
    cpu.set_nz(value);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    cpu.x = value;
    cpu.set_nz(value);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.load(operand.location);
    cpu.y = value;
    cpu.set_nz(value);
}

/// Executes STA, STX or STY: writes `register` to the operand address.
pub(crate) fn execute_store<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    operand: Operand,
    register: OperandLocation,
) {
    let value = cpu.load(register);
    cpu.store(operand.location, value);
}

//! # Stack Instructions
//!
//! PHA, PHP, PLA, PLP. The stack lives at 0x0100-0x01FF and grows downward.

use crate::cpu::{BREAK, UNUSED};
use crate::{Cpu, MemoryBus};

/// Executes the PHA (Push Accumulator) instruction.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.a);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy has the Break and unused bits set.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.status() | BREAK | UNUSED);
}

/// Executes the PLA (Pull Accumulator) instruction. Sets N and Z.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let value = cpu.pull();
    cpu.a = value;
    cpu.set_nz(value);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// Bits 4 and 5 of the pulled byte are discarded.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let status = cpu.pull();
    cpu.set_status(status);
}

//! # 6502 Instruction Implementations
//!
//! Instruction handlers, organized by category. Each handler receives the CPU and
//! the operand the addressing resolver produced; PC has already moved past the
//! instruction's bytes when a handler runs.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::addressing::{IndexRegister, Operand, OperandLocation};
use crate::{Cpu, Instruction, MemoryBus};

/// Runs `instruction` against an already resolved operand.
pub(crate) fn execute<M: MemoryBus>(cpu: &mut Cpu<M>, instruction: Instruction, operand: Operand) {
    use Instruction::*;
    match instruction {
        Adc => alu::execute_adc(cpu, operand),
        Sbc => alu::execute_sbc(cpu, operand),
        And => alu::execute_and(cpu, operand),
        Ora => alu::execute_ora(cpu, operand),
        Eor => alu::execute_eor(cpu, operand),
        Cmp => alu::execute_compare(cpu, operand, OperandLocation::Accumulator),
        Cpx => alu::execute_compare(cpu, operand, OperandLocation::Register(IndexRegister::X)),
        Cpy => alu::execute_compare(cpu, operand, OperandLocation::Register(IndexRegister::Y)),
        Bit => alu::execute_bit(cpu, operand),

        Bcc | Bcs | Beq | Bne | Bmi | Bpl | Bvs | Bvc => {
            let taken = branches::condition_met(cpu, instruction);
            branches::execute_branch(cpu, operand, taken)
        }

        Asl => shifts::execute_asl(cpu, operand),
        Lsr => shifts::execute_lsr(cpu, operand),
        Rol => shifts::execute_rol(cpu, operand),
        Ror => shifts::execute_ror(cpu, operand),

        Lda => load_store::execute_lda(cpu, operand),
        Ldx => load_store::execute_ldx(cpu, operand),
        Ldy => load_store::execute_ldy(cpu, operand),
        Sta => load_store::execute_store(cpu, operand, OperandLocation::Accumulator),
        Stx => load_store::execute_store(cpu, operand, OperandLocation::Register(IndexRegister::X)),
        Sty => load_store::execute_store(cpu, operand, OperandLocation::Register(IndexRegister::Y)),

        Inc => inc_dec::execute_inc(cpu, operand),
        Dec => inc_dec::execute_dec(cpu, operand),
        Inx => inc_dec::execute_inc_register(cpu, IndexRegister::X),
        Iny => inc_dec::execute_inc_register(cpu, IndexRegister::Y),
        Dex => inc_dec::execute_dec_register(cpu, IndexRegister::X),
        Dey => inc_dec::execute_dec_register(cpu, IndexRegister::Y),

        Jmp => control::execute_jmp(cpu, operand),
        Jsr => control::execute_jsr(cpu, operand),
        Rts => control::execute_rts(cpu),
        Rti => control::execute_rti(cpu),
        Brk => control::execute_brk(cpu),
        Nop => {}

        Pha => stack::execute_pha(cpu),
        Php => stack::execute_php(cpu),
        Pla => stack::execute_pla(cpu),
        Plp => stack::execute_plp(cpu),

        Clc | Sec | Cli | Sei | Cld | Sed | Clv => flags::execute_flag_op(cpu, instruction),

        Tax => transfer::execute_tax(cpu),
        Tay => transfer::execute_tay(cpu),
        Txa => transfer::execute_txa(cpu),
        Tya => transfer::execute_tya(cpu),
        Tsx => transfer::execute_tsx(cpu),
        Txs => transfer::execute_txs(cpu),
    }
}

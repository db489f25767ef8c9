//! # Opcode Matrix
//!
//! The 16x16 opcode matrix: row is the opcode's high nibble, column its low nibble.
//! Each entry pairs an instruction with an addressing mode and a base cycle count.
//!
//! The 151 documented NMOS opcodes are decoded. The remaining 105 slots decode as a
//! one-byte, two-cycle NOP; undocumented instructions are not emulated.

use crate::addressing::AddressingMode;

/// The 56 documented 6502 instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Instruction {
    /// Three-letter assembler mnemonic.
    pub fn mnemonic(self) -> &'static str {
        use Instruction::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
        }
    }

    /// Read instructions pay one extra cycle when indexing crosses a page.
    ///
    /// Stores and read-modify-write instructions always take the long path and
    /// their base cycles already include it.
    pub fn pays_page_penalty(self) -> bool {
        use Instruction::*;
        matches!(
            self,
            Adc | And | Cmp | Eor | Lda | Ldx | Ldy | Ora | Sbc
        )
    }
}

/// One slot of the opcode matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    /// Instruction executed for this opcode.
    pub instruction: Instruction,

    /// How the operand is located.
    pub addressing_mode: AddressingMode,

    /// Cycle cost before page-crossing and branch penalties (2-7).
    pub base_cycles: u8,
}

impl OpcodeEntry {
    /// Instruction size in bytes, opcode included.
    pub fn size_bytes(&self) -> u8 {
        1 + self.addressing_mode.operand_bytes()
    }

    /// Whether this slot holds an undocumented opcode decoded as NOP.
    pub fn is_filler(&self) -> bool {
        self.instruction == Instruction::Nop && self.addressing_mode == AddressingMode::Stack
    }
}

const fn op(instruction: Instruction, addressing_mode: AddressingMode, base_cycles: u8) -> OpcodeEntry {
    OpcodeEntry {
        instruction,
        addressing_mode,
        base_cycles,
    }
}

use AddressingMode::{
    Absolute as ABS, AbsoluteX as ABX, AbsoluteY as ABY, Accumulator as ACC, Immediate as IMM,
    Implied as IMP, Indirect as IND, IndirectX as IZX, IndirectY as IZY, Relative as REL,
    Stack as STK, ZeroPage as ZP0, ZeroPageX as ZPX, ZeroPageY as ZPY,
};
use Instruction::*;

/// Undocumented opcode slot. Tagged with `Stack` so `is_filler` can tell it apart
/// from the real NOP at 0xEA; neither reads operand bytes.
const XXX: OpcodeEntry = op(Nop, STK, 2);

/// The opcode matrix, indexed `[opcode >> 4][opcode & 0x0F]`.
///
/// # Examples
///
/// ```
/// use nes6502::{AddressingMode, Instruction, OPCODE_MATRIX};
///
/// // LDA immediate (opcode 0xA9)
/// let lda_imm = &OPCODE_MATRIX[0xA][0x9];
/// assert_eq!(lda_imm.instruction, Instruction::Lda);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// ```
#[rustfmt::skip]
pub static OPCODE_MATRIX: [[OpcodeEntry; 16]; 16] = [
    // 0x0_
    [op(Brk, STK, 7), op(Ora, IZX, 6), XXX, XXX, XXX, op(Ora, ZP0, 3), op(Asl, ZP0, 5), XXX,
     op(Php, STK, 3), op(Ora, IMM, 2), op(Asl, ACC, 2), XXX, XXX, op(Ora, ABS, 4), op(Asl, ABS, 6), XXX],
    // 0x1_
    [op(Bpl, REL, 2), op(Ora, IZY, 5), XXX, XXX, XXX, op(Ora, ZPX, 4), op(Asl, ZPX, 6), XXX,
     op(Clc, IMP, 2), op(Ora, ABY, 4), XXX, XXX, XXX, op(Ora, ABX, 4), op(Asl, ABX, 7), XXX],
    // 0x2_
    [op(Jsr, ABS, 6), op(And, IZX, 6), XXX, XXX, op(Bit, ZP0, 3), op(And, ZP0, 3), op(Rol, ZP0, 5), XXX,
     op(Plp, STK, 4), op(And, IMM, 2), op(Rol, ACC, 2), XXX, op(Bit, ABS, 4), op(And, ABS, 4), op(Rol, ABS, 6), XXX],
    // 0x3_
    [op(Bmi, REL, 2), op(And, IZY, 5), XXX, XXX, XXX, op(And, ZPX, 4), op(Rol, ZPX, 6), XXX,
     op(Sec, IMP, 2), op(And, ABY, 4), XXX, XXX, XXX, op(And, ABX, 4), op(Rol, ABX, 7), XXX],
    // 0x4_
    [op(Rti, STK, 6), op(Eor, IZX, 6), XXX, XXX, XXX, op(Eor, ZP0, 3), op(Lsr, ZP0, 5), XXX,
     op(Pha, STK, 3), op(Eor, IMM, 2), op(Lsr, ACC, 2), XXX, op(Jmp, ABS, 3), op(Eor, ABS, 4), op(Lsr, ABS, 6), XXX],
    // 0x5_
    [op(Bvc, REL, 2), op(Eor, IZY, 5), XXX, XXX, XXX, op(Eor, ZPX, 4), op(Lsr, ZPX, 6), XXX,
     op(Cli, IMP, 2), op(Eor, ABY, 4), XXX, XXX, XXX, op(Eor, ABX, 4), op(Lsr, ABX, 7), XXX],
    // 0x6_
    [op(Rts, STK, 6), op(Adc, IZX, 6), XXX, XXX, XXX, op(Adc, ZP0, 3), op(Ror, ZP0, 5), XXX,
     op(Pla, STK, 4), op(Adc, IMM, 2), op(Ror, ACC, 2), XXX, op(Jmp, IND, 5), op(Adc, ABS, 4), op(Ror, ABS, 6), XXX],
    // 0x7_
    [op(Bvs, REL, 2), op(Adc, IZY, 5), XXX, XXX, XXX, op(Adc, ZPX, 4), op(Ror, ZPX, 6), XXX,
     op(Sei, IMP, 2), op(Adc, ABY, 4), XXX, XXX, XXX, op(Adc, ABX, 4), op(Ror, ABX, 7), XXX],
    // 0x8_
    [XXX, op(Sta, IZX, 6), XXX, XXX, op(Sty, ZP0, 3), op(Sta, ZP0, 3), op(Stx, ZP0, 3), XXX,
     op(Dey, IMP, 2), XXX, op(Txa, IMP, 2), XXX, op(Sty, ABS, 4), op(Sta, ABS, 4), op(Stx, ABS, 4), XXX],
    // 0x9_
    [op(Bcc, REL, 2), op(Sta, IZY, 6), XXX, XXX, op(Sty, ZPX, 4), op(Sta, ZPX, 4), op(Stx, ZPY, 4), XXX,
     op(Tya, IMP, 2), op(Sta, ABY, 5), op(Txs, IMP, 2), XXX, XXX, op(Sta, ABX, 5), XXX, XXX],
    // 0xA_
    [op(Ldy, IMM, 2), op(Lda, IZX, 6), op(Ldx, IMM, 2), XXX, op(Ldy, ZP0, 3), op(Lda, ZP0, 3), op(Ldx, ZP0, 3), XXX,
     op(Tay, IMP, 2), op(Lda, IMM, 2), op(Tax, IMP, 2), XXX, op(Ldy, ABS, 4), op(Lda, ABS, 4), op(Ldx, ABS, 4), XXX],
    // 0xB_
    [op(Bcs, REL, 2), op(Lda, IZY, 5), XXX, XXX, op(Ldy, ZPX, 4), op(Lda, ZPX, 4), op(Ldx, ZPY, 4), XXX,
     op(Clv, IMP, 2), op(Lda, ABY, 4), op(Tsx, IMP, 2), XXX, op(Ldy, ABX, 4), op(Lda, ABX, 4), op(Ldx, ABY, 4), XXX],
    // 0xC_
    [op(Cpy, IMM, 2), op(Cmp, IZX, 6), XXX, XXX, op(Cpy, ZP0, 3), op(Cmp, ZP0, 3), op(Dec, ZP0, 5), XXX,
     op(Iny, IMP, 2), op(Cmp, IMM, 2), op(Dex, IMP, 2), XXX, op(Cpy, ABS, 4), op(Cmp, ABS, 4), op(Dec, ABS, 6), XXX],
    // 0xD_
    [op(Bne, REL, 2), op(Cmp, IZY, 5), XXX, XXX, XXX, op(Cmp, ZPX, 4), op(Dec, ZPX, 6), XXX,
     op(Cld, IMP, 2), op(Cmp, ABY, 4), XXX, XXX, XXX, op(Cmp, ABX, 4), op(Dec, ABX, 7), XXX],
    // 0xE_
    [op(Cpx, IMM, 2), op(Sbc, IZX, 6), XXX, XXX, op(Cpx, ZP0, 3), op(Sbc, ZP0, 3), op(Inc, ZP0, 5), XXX,
     op(Inx, IMP, 2), op(Sbc, IMM, 2), op(Nop, IMP, 2), XXX, op(Cpx, ABS, 4), op(Sbc, ABS, 4), op(Inc, ABS, 6), XXX],
    // 0xF_
    [op(Beq, REL, 2), op(Sbc, IZY, 5), XXX, XXX, XXX, op(Sbc, ZPX, 4), op(Inc, ZPX, 6), XXX,
     op(Sed, IMP, 2), op(Sbc, ABY, 4), XXX, XXX, XXX, op(Sbc, ABX, 4), op(Inc, ABX, 7), XXX],
];

/// Looks up the matrix entry for an opcode byte.
pub fn decode(opcode: u8) -> &'static OpcodeEntry {
    &OPCODE_MATRIX[(opcode >> 4) as usize][(opcode & 0x0F) as usize]
}

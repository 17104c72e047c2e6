use types::{HypoError, Result, Word};

use crate::instruction::{Instruction, OperandSpec};
use crate::isa::{AddressingMode, Opcode};
use crate::registers::Register;

const OPCODE_PLACE: Word = 10_000;
const OP1_MODE_PLACE: Word = 1_000;
const OP1_REG_PLACE: Word = 100;
const OP2_MODE_PLACE: Word = 10;

/// Splits an instruction word into its five decimal fields.
///
/// EDUCATIONAL PURPOSE: HYPO instructions are read digit by digit rather than
/// bit by bit. The word `opcode*10000 + m1*1000 + r1*100 + m2*10 + r2` packs
/// the opcode in the leading digits and one digit for each of the four operand
/// fields below it.
///
/// VALIDATION ORDER: opcode first, then both modes, then both register digits.
/// The first bad field decides the error:
/// - negative word or opcode above 12: `InvalidOpcode`
/// - mode digit 7..=9: `InvalidMode`
/// - register digit 8 or 9: `InvalidRegister`
pub fn decode(word: Word) -> Result<Instruction> {
    if word < 0 {
        return Err(HypoError::InvalidOpcode);
    }
    let opcode = Opcode::from_word(word / OPCODE_PLACE).ok_or(HypoError::InvalidOpcode)?;

    let rest = word % OPCODE_PLACE;
    let m1 = rest / OP1_MODE_PLACE;
    let r1 = rest % OP1_MODE_PLACE / OP1_REG_PLACE;
    let m2 = rest % OP1_REG_PLACE / OP2_MODE_PLACE;
    let r2 = rest % OP2_MODE_PLACE;

    let m1 = AddressingMode::from_word(m1).ok_or(HypoError::InvalidMode)?;
    let m2 = AddressingMode::from_word(m2).ok_or(HypoError::InvalidMode)?;
    let r1 = Register::from_digit(r1).ok_or(HypoError::InvalidRegister)?;
    let r2 = Register::from_digit(r2).ok_or(HypoError::InvalidRegister)?;

    Ok(Instruction::new(
        opcode,
        OperandSpec::new(m1, r1),
        OperandSpec::new(m2, r2),
    ))
}

/// Packs an instruction back into its decimal word. Inverse of [`decode`].
pub fn encode(instr: &Instruction) -> Word {
    instr.opcode.code() * OPCODE_PLACE
        + instr.op1.mode.code() * OP1_MODE_PLACE
        + instr.op1.reg.index() as Word * OP1_REG_PLACE
        + instr.op2.mode.code() * OP2_MODE_PLACE
        + instr.op2.reg.index() as Word
}

//! Pure arithmetic and flag computation.
//!
//! Every helper returns the result together with the new F register value;
//! instruction handlers apply both. Keeping these as free functions over
//! plain bytes guarantees identical flag semantics wherever the same
//! operation recurs in the opcode map, and makes the flag rules testable
//! without a machine.
//!
//! Flag layout is ZNHC---- (`FLAG_Z` = bit 7 down to `FLAG_C` = bit 4).

use crate::cpu::constants::*;

/// result = value + 1. Z from result, H iff the low nibble was 0xF, N
/// cleared, C preserved.
pub fn inc8(value: u8, flags: u8) -> (u8, u8) {
    let result = value.wrapping_add(1);
    let mut f = flags & FLAG_C;
    if result == 0 {
        f |= FLAG_Z;
    }
    if (value & 0x0F) == 0x0F {
        f |= FLAG_H;
    }
    (result, f)
}

/// result = value - 1. Z from result, H iff the low nibble was 0x0, N set,
/// C preserved.
pub fn dec8(value: u8, flags: u8) -> (u8, u8) {
    let result = value.wrapping_sub(1);
    let mut f = (flags & FLAG_C) | FLAG_N;
    if result == 0 {
        f |= FLAG_Z;
    }
    if (value & 0x0F) == 0x00 {
        f |= FLAG_H;
    }
    (result, f)
}

/// 16-bit add onto HL. H from bit 11, C from bit 15, N cleared, Z preserved.
pub fn add16(hl: u16, rhs: u16, flags: u8) -> (u16, u8) {
    let (result, carry) = hl.overflowing_add(rhs);
    let mut f = flags & FLAG_Z;
    if (hl & 0x0FFF) + (rhs & 0x0FFF) > 0x0FFF {
        f |= FLAG_H;
    }
    if carry {
        f |= FLAG_C;
    }
    (result, f)
}

/// 8-bit add (ADD / ADC). Carry-in is taken from `flags` when `with_carry`.
pub fn add8(a: u8, rhs: u8, flags: u8, with_carry: bool) -> (u8, u8) {
    let carry_in = if with_carry && (flags & FLAG_C) != 0 {
        1
    } else {
        0
    };
    let (partial, c1) = a.overflowing_add(rhs);
    let (result, c2) = partial.overflowing_add(carry_in);
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if (a & 0x0F) + (rhs & 0x0F) + carry_in > 0x0F {
        f |= FLAG_H;
    }
    if c1 || c2 {
        f |= FLAG_C;
    }
    (result, f)
}

/// 8-bit subtract (SUB / SBC / CP). CP callers keep the flags and discard
/// the result.
pub fn sub8(a: u8, rhs: u8, flags: u8, with_carry: bool) -> (u8, u8) {
    let carry_in = if with_carry && (flags & FLAG_C) != 0 {
        1
    } else {
        0
    };
    let (partial, b1) = a.overflowing_sub(rhs);
    let (result, b2) = partial.overflowing_sub(carry_in);
    let mut f = FLAG_N;
    if result == 0 {
        f |= FLAG_Z;
    }
    if (a & 0x0F) < (rhs & 0x0F) + carry_in {
        f |= FLAG_H;
    }
    if b1 || b2 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Bitwise AND. H is always set, N and C cleared.
pub fn and8(a: u8, rhs: u8) -> (u8, u8) {
    let result = a & rhs;
    let f = if result == 0 { FLAG_Z | FLAG_H } else { FLAG_H };
    (result, f)
}

pub fn xor8(a: u8, rhs: u8) -> (u8, u8) {
    let result = a ^ rhs;
    let f = if result == 0 { FLAG_Z } else { 0 };
    (result, f)
}

pub fn or8(a: u8, rhs: u8) -> (u8, u8) {
    let result = a | rhs;
    let f = if result == 0 { FLAG_Z } else { 0 };
    (result, f)
}

// --- Rotates and shifts (CB forms: Z from result) ---

/// Rotate left circular; bit 7 goes to both bit 0 and C.
pub fn rlc8(value: u8) -> (u8, u8) {
    let result = value.rotate_left(1);
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x80 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Rotate right circular; bit 0 goes to both bit 7 and C.
pub fn rrc8(value: u8) -> (u8, u8) {
    let result = value.rotate_right(1);
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x01 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Rotate left through carry; C fills bit 0, bit 7 becomes the new C.
pub fn rl8(value: u8, flags: u8) -> (u8, u8) {
    let carry_in = ((flags & FLAG_C) != 0) as u8;
    let result = (value << 1) | carry_in;
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x80 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Rotate right through carry; C fills bit 7, bit 0 becomes the new C.
pub fn rr8(value: u8, flags: u8) -> (u8, u8) {
    let carry_in = ((flags & FLAG_C) != 0) as u8;
    let result = (value >> 1) | (carry_in << 7);
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x01 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Shift left arithmetic; bit 0 becomes 0.
pub fn sla8(value: u8) -> (u8, u8) {
    let result = value << 1;
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x80 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Shift right arithmetic; bit 7 is preserved (sign extension).
pub fn sra8(value: u8) -> (u8, u8) {
    let result = (value >> 1) | (value & 0x80);
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x01 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Shift right logical; bit 7 becomes 0.
pub fn srl8(value: u8) -> (u8, u8) {
    let result = value >> 1;
    let mut f = 0;
    if result == 0 {
        f |= FLAG_Z;
    }
    if value & 0x01 != 0 {
        f |= FLAG_C;
    }
    (result, f)
}

/// Swap the nibbles. Only Z can end up set.
pub fn swap8(value: u8) -> (u8, u8) {
    let result = value.rotate_left(4);
    let f = if result == 0 { FLAG_Z } else { 0 };
    (result, f)
}

/// BIT test: returns only the new flags. Z iff the bit is clear, H set,
/// N cleared, C preserved.
pub fn bit8(bit: u8, value: u8, flags: u8) -> u8 {
    let mut f = (flags & FLAG_C) | FLAG_H;
    if (value >> bit) & 1 == 0 {
        f |= FLAG_Z;
    }
    f
}

// --- Accumulator rotates (Z, N, H always cleared) ---

pub fn rlca(value: u8) -> (u8, u8) {
    let (result, f) = rlc8(value);
    (result, f & FLAG_C)
}

pub fn rrca(value: u8) -> (u8, u8) {
    let (result, f) = rrc8(value);
    (result, f & FLAG_C)
}

pub fn rla(value: u8, flags: u8) -> (u8, u8) {
    let (result, f) = rl8(value, flags);
    (result, f & FLAG_C)
}

pub fn rra(value: u8, flags: u8) -> (u8, u8) {
    let (result, f) = rr8(value, flags);
    (result, f & FLAG_C)
}

/// SP plus a signed 8-bit offset (ADD SP,r8 and LD HL,SP+r8). Z and N are
/// always cleared; H and C come from the unsigned addition of the raw
/// immediate byte onto the low byte of SP.
pub fn add_sp(sp: u16, offset: i8) -> (u16, u8) {
    let rhs = offset as i16 as u16;
    let result = sp.wrapping_add(rhs);
    let mut f = 0;
    if (sp & 0x000F) + (rhs & 0x000F) > 0x000F {
        f |= FLAG_H;
    }
    if (sp & 0x00FF) + (rhs & 0x00FF) > 0x00FF {
        f |= FLAG_C;
    }
    (result, f)
}

/// Decimal adjust after an 8-bit add or subtract, restoring packed BCD.
///
/// With N set the previous operation was a subtract: 0x06 and/or 0x60 are
/// subtracted back out according to H and C. With N clear they are added,
/// and C is set when the high digit overflowed. Z comes from the adjusted
/// result, H is always cleared, N is preserved. C is never cleared.
pub fn daa(a: u8, flags: u8) -> (u8, u8) {
    let n = (flags & FLAG_N) != 0;
    let h = (flags & FLAG_H) != 0;
    let c = (flags & FLAG_C) != 0;

    let mut adjustment = 0u8;
    let mut set_carry = false;
    let result = if !n {
        if c || a > 0x99 {
            adjustment |= 0x60;
            set_carry = true;
        }
        if h || (a & 0x0F) > 0x09 {
            adjustment |= 0x06;
        }
        a.wrapping_add(adjustment)
    } else {
        if c {
            adjustment |= 0x60;
            set_carry = true;
        }
        if h {
            adjustment |= 0x06;
        }
        a.wrapping_sub(adjustment)
    };

    let mut f = flags & FLAG_N;
    if result == 0 {
        f |= FLAG_Z;
    }
    if set_carry {
        f |= FLAG_C;
    }
    (result, f)
}

//! The LR35902 register file.
//!
//! Eight 8-bit registers viewable as four 16-bit pairs, plus PC and SP. The
//! pairs are projections over the same bytes, never separate storage, so a
//! 16-bit write is immediately visible through both 8-bit halves.

/// Register state, including the flag register F (ZNHC----).
#[derive(Debug, Clone)]
pub struct Registers {
    pub(crate) a: u8,
    pub(crate) f: u8,
    pub(crate) b: u8,
    pub(crate) c: u8,
    pub(crate) d: u8,
    pub(crate) e: u8,
    pub(crate) h: u8,
    pub(crate) l: u8,
    pub(crate) sp: u16,
    pub(crate) pc: u16,
}

impl Registers {
    /// Creates the power-on register state.
    ///
    /// With `skip_boot_rom` the registers hold the values the DMG boot ROM
    /// leaves behind (PC = 0x0100, SP = 0xFFFE); without it, execution
    /// starts zeroed at 0x0000.
    pub fn new(skip_boot_rom: bool) -> Self {
        let (init_a, init_f, init_bc, init_de, init_hl, init_pc, init_sp) = if skip_boot_rom {
            // Post-boot DMG values
            (0x01, 0xB0, 0x0013, 0x00D8, 0x014D, 0x0100, 0xFFFE)
        } else {
            (0x00, 0x00, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000)
        };

        Registers {
            a: init_a,
            f: init_f & 0xF0,
            b: (init_bc >> 8) as u8,
            c: init_bc as u8,
            d: (init_de >> 8) as u8,
            e: init_de as u8,
            h: (init_hl >> 8) as u8,
            l: init_hl as u8,
            sp: init_sp,
            pc: init_pc,
        }
    }

    // --- 8-bit accessors ---
    #[inline(always)]
    pub fn a(&self) -> u8 {
        self.a
    }
    #[inline(always)]
    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }
    #[inline(always)]
    pub fn f(&self) -> u8 {
        self.f
    }
    #[inline(always)]
    pub fn set_f(&mut self, value: u8) {
        self.f = value & 0xF0;
    }
    #[inline(always)]
    pub fn b(&self) -> u8 {
        self.b
    }
    #[inline(always)]
    pub fn set_b(&mut self, value: u8) {
        self.b = value;
    }
    #[inline(always)]
    pub fn c(&self) -> u8 {
        self.c
    }
    #[inline(always)]
    pub fn set_c(&mut self, value: u8) {
        self.c = value;
    }
    #[inline(always)]
    pub fn d(&self) -> u8 {
        self.d
    }
    #[inline(always)]
    pub fn set_d(&mut self, value: u8) {
        self.d = value;
    }
    #[inline(always)]
    pub fn e(&self) -> u8 {
        self.e
    }
    #[inline(always)]
    pub fn set_e(&mut self, value: u8) {
        self.e = value;
    }
    #[inline(always)]
    pub fn h(&self) -> u8 {
        self.h
    }
    #[inline(always)]
    pub fn set_h(&mut self, value: u8) {
        self.h = value;
    }
    #[inline(always)]
    pub fn l(&self) -> u8 {
        self.l
    }
    #[inline(always)]
    pub fn set_l(&mut self, value: u8) {
        self.l = value;
    }

    // --- 16-bit pair views ---
    #[inline(always)]
    pub fn af(&self) -> u16 {
        ((self.a as u16) << 8) | (self.f as u16)
    }
    #[inline(always)]
    pub fn set_af(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.f = (value & 0x00F0) as u8;
    }
    #[inline(always)]
    pub fn bc(&self) -> u16 {
        u16::from_le_bytes([self.c, self.b])
    }
    #[inline(always)]
    pub fn set_bc(&mut self, value: u16) {
        let bytes = value.to_le_bytes();
        self.c = bytes[0];
        self.b = bytes[1];
    }
    #[inline(always)]
    pub fn de(&self) -> u16 {
        u16::from_le_bytes([self.e, self.d])
    }
    #[inline(always)]
    pub fn set_de(&mut self, value: u16) {
        let bytes = value.to_le_bytes();
        self.e = bytes[0];
        self.d = bytes[1];
    }
    #[inline(always)]
    pub fn hl(&self) -> u16 {
        u16::from_le_bytes([self.l, self.h])
    }
    #[inline(always)]
    pub fn set_hl(&mut self, value: u16) {
        let bytes = value.to_le_bytes();
        self.l = bytes[0];
        self.h = bytes[1];
    }

    // --- PC / SP ---
    #[inline(always)]
    pub fn pc(&self) -> u16 {
        self.pc
    }
    #[inline(always)]
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
    #[inline(always)]
    pub fn sp(&self) -> u16 {
        self.sp
    }
    #[inline(always)]
    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    // --- Flags ---
    /// Tests a flag by mask (`FLAG_Z`, `FLAG_N`, `FLAG_H`, `FLAG_C`).
    #[inline(always)]
    pub fn flag(&self, flag_mask: u8) -> bool {
        (self.f & flag_mask) != 0
    }
    /// Sets or clears the masked flag bits. The low nibble of F stays zero.
    #[inline(always)]
    pub fn set_flag(&mut self, flag_mask: u8, set: bool) {
        if set {
            self.f |= flag_mask;
        } else {
            self.f &= !flag_mask;
        }
        self.f &= 0xF0;
    }
}

// --- Address Space Landmarks ---
pub const ADDRESS_SPACE_SIZE: usize = 0x10000; // 64 KiB, addresses 0x0000-0xFFFF

// High page used by the LDH instructions (address = 0xFF00 + a8).
pub const HIGH_PAGE_START: u16 = 0xFF00;

// --- Interrupt Registers ---
// No interrupt controller lives in this crate; these are the two locations a
// future one (or an MMIO device standing in for one) communicates through.
pub const IF_ADDR: u16 = 0xFF0F; // Interrupt Flag (R/W)
pub const INTERRUPT_ENABLE_REGISTER: u16 = 0xFFFF; // IE, single byte

// --- Interrupt Bits (for IF and IE) ---
// Bit position corresponds to the interrupt priority (0 = highest)
pub const VBLANK_INTERRUPT_BIT: u8 = 0;
pub const LCD_STAT_INTERRUPT_BIT: u8 = 1;
pub const TIMER_INTERRUPT_BIT: u8 = 2;
pub const SERIAL_INTERRUPT_BIT: u8 = 3;
pub const JOYPAD_INTERRUPT_BIT: u8 = 4;

// Mask of the five defined interrupt sources.
pub const INTERRUPT_MASK: u8 = 0x1F;

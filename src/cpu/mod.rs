//! The Sharp SM83 (LR35902) CPU core: register state plus the cycle-stepped
//! dispatch engine that drives it.
//!
//! The engine is resumable one T-cycle at a time so future peripherals can
//! be interleaved at cycle granularity. An instruction's full effect is
//! applied atomically at the start of its cycle window; the remaining ticks
//! of the window only count time.

use std::fmt;

use crate::instruction::{Branch, CB_OPCODES, OPCODES};
use crate::memory_bus::MemoryBus;
use crate::memory_map;
use crate::registers::Registers;

// Declare submodules
pub mod constants;
#[macro_use]
mod ops_macros;
mod ops_alu;
mod ops_cb;
mod ops_control;
mod ops_load;
mod ops_rot_shift;

// Re-export flag constants for handler and test use
pub use constants::*;

/// A fatal condition raised during dispatch. The run must stop; continuing
/// past it would execute against undefined machine state. Embedders that
/// want a different policy (skip, patch, trap) can match on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    InvalidOpcode { opcode: u8, pc: u16 },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::InvalidOpcode { opcode, pc } => {
                write!(f, "invalid opcode {:#04X} at PC={:#06X}", opcode, pc)
            }
        }
    }
}

impl std::error::Error for CpuError {}

// Type alias for CPU operation results
pub type CpuResult<T> = Result<T, CpuError>;

/// CPU state and execution logic.
#[derive(Debug, Clone)]
pub struct Cpu {
    regs: Registers,

    // --- CPU State Flags ---
    ime: bool,            // Interrupt Master Enable flag
    halted: bool,         // CPU is in HALT state (waiting for interrupt)
    stop_requested: bool, // CPU received STOP instruction (low power state)
    ime_scheduled: bool,  // IME will be enabled after the next instruction

    // --- Internal Timing/Execution State ---
    cycles_current: u64, // Monotonic T-cycle counter
    cycles_target: u64,  // Cycle at which the next fetch is due
    fetched_opcode: u8,  // Last opcode fetched (for error reporting/debugging)
    instruction_pc: u16, // PC at the start of the current instruction
}

impl Cpu {
    /// Creates a new CPU instance, optionally skipping the boot ROM sequence.
    pub fn new(skip_boot_rom: bool) -> Self {
        Cpu {
            regs: Registers::new(skip_boot_rom),
            ime: false,
            halted: false,
            stop_requested: false,
            ime_scheduled: false,
            cycles_current: 0,
            cycles_target: 0,
            fetched_opcode: 0,
            instruction_pc: 0,
        }
    }

    /// Initializes interrupt registers to their state after the boot ROM
    /// finishes. Should only be called if `skip_boot_rom` was true.
    pub fn initialize_post_boot_io(memory_bus: &mut MemoryBus) {
        memory_bus.write_byte(memory_map::IF_ADDR, 0xE1);
        memory_bus.write_byte(memory_map::INTERRUPT_ENABLE_REGISTER, 0x00);
    }

    /// Advances the machine by exactly one T-cycle.
    ///
    /// When the previous instruction's cycle budget has elapsed the next
    /// opcode is fetched, decoded and executed in full; otherwise the call
    /// only counts down the remaining window. Fetching a byte with no
    /// table entry fails without consuming the tick, so repeated calls
    /// keep reporting the same error against unchanged state.
    pub fn tick(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<()> {
        if self.cycles_current == self.cycles_target {
            self.begin_instruction(memory_bus)?;
        }
        self.cycles_current = self.cycles_current.wrapping_add(1);
        Ok(())
    }

    /// Runs ticks up to and through the next instruction boundary.
    /// Returns the number of T-cycles consumed.
    pub fn step(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<u64> {
        let start = self.cycles_current;
        self.tick(memory_bus)?;
        while self.cycles_current < self.cycles_target {
            self.tick(memory_bus)?;
        }
        Ok(self.cycles_current - start)
    }

    /// The awaiting-fetch half of `tick`: fetch, decode, advance PC by the
    /// instruction length, execute, and open the new cycle window.
    fn begin_instruction(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<()> {
        // A halted CPU wakes when an enabled interrupt is pending,
        // otherwise it idles for one machine cycle.
        if self.halted {
            let ie = memory_bus.read_byte(memory_map::INTERRUPT_ENABLE_REGISTER);
            let iflags = memory_bus.read_byte(memory_map::IF_ADDR);
            if (ie & iflags & memory_map::INTERRUPT_MASK) != 0 {
                self.halted = false;
            } else {
                self.cycles_target = self.cycles_current.wrapping_add(4);
                return Ok(());
            }
        }
        if self.stop_requested {
            self.cycles_target = self.cycles_current.wrapping_add(4);
            return Ok(());
        }

        // --- Fetch Phase ---
        self.instruction_pc = self.regs.pc;
        self.fetched_opcode = memory_bus.read_byte(self.regs.pc);

        // --- Decode Phase ---
        // The CB prefix selects from the second table using the byte that
        // follows it; the entry's length (2) covers both bytes.
        let instruction = if self.fetched_opcode == 0xCB {
            let cb_opcode = memory_bus.read_byte(self.regs.pc.wrapping_add(1));
            &CB_OPCODES[cb_opcode as usize]
        } else {
            &OPCODES[self.fetched_opcode as usize]
        };

        if log::log_enabled!(log::Level::Trace) {
            let (text, _) = self.disassemble_instruction(self.instruction_pc, memory_bus);
            log::trace!("{:#06X}: {}", self.instruction_pc, text);
        }

        // --- Advance PC Phase ---
        // PC moves past the instruction before the handler runs; handlers
        // that transfer control overwrite it outright, so the advance is
        // never double-applied.
        self.regs.pc = self.regs.pc.wrapping_add(instruction.length as u16);

        // --- Execute Phase ---
        match (instruction.execute)(self, memory_bus) {
            Ok(branch) => {
                let mut cost = instruction.cycles as u64;
                if branch == Branch::Taken {
                    cost += instruction.cycles_branch as u64;
                }
                self.cycles_target = self.cycles_current.wrapping_add(cost);

                // EI takes effect only after the following instruction has
                // executed.
                if self.ime_scheduled && self.fetched_opcode != 0xFB {
                    self.ime = true;
                    self.ime_scheduled = false;
                }
                Ok(())
            }
            Err(error) => {
                // Rewind so the failed fetch stays observable at PC and a
                // retry reports the identical error.
                self.regs.pc = self.instruction_pc;
                log::error!(
                    "CPU fault at PC={:#06X} (opcode {:#04X}): {}",
                    self.instruction_pc,
                    self.fetched_opcode,
                    error
                );
                Err(error)
            }
        }
    }

    // --- Memory Access Helpers ---
    #[inline(always)]
    pub(crate) fn read_d8(&self, memory_bus: &mut MemoryBus) -> u8 {
        memory_bus.read_byte(self.instruction_pc.wrapping_add(1))
    }
    #[inline(always)]
    pub(crate) fn read_d16(&self, memory_bus: &mut MemoryBus) -> u16 {
        let lo = memory_bus.read_byte(self.instruction_pc.wrapping_add(1));
        let hi = memory_bus.read_byte(self.instruction_pc.wrapping_add(2));
        u16::from_le_bytes([lo, hi])
    }
    #[inline(always)]
    pub(crate) fn read_r8(&self, memory_bus: &mut MemoryBus) -> i8 {
        memory_bus.read_byte(self.instruction_pc.wrapping_add(1)) as i8
    }

    // --- Stack Operations ---
    #[inline(always)]
    pub(crate) fn push_word(&mut self, value: u16, memory_bus: &mut MemoryBus) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        memory_bus.write_byte(self.regs.sp, (value >> 8) as u8);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        memory_bus.write_byte(self.regs.sp, (value & 0xFF) as u8);
    }
    #[inline(always)]
    pub(crate) fn pop_word(&mut self, memory_bus: &mut MemoryBus) -> u16 {
        let low = memory_bus.read_byte(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let high = memory_bus.read_byte(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        (high << 8) | low
    }

    // --- Public accessors ---
    #[inline(always)]
    pub fn regs(&self) -> &Registers {
        &self.regs
    }
    #[inline(always)]
    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }
    #[inline(always)]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }
    #[inline(always)]
    pub fn sp(&self) -> u16 {
        self.regs.sp
    }
    #[inline(always)]
    pub fn ime(&self) -> bool {
        self.ime
    }
    #[inline(always)]
    pub fn halted(&self) -> bool {
        self.halted
    }
    #[inline(always)]
    pub fn stopped(&self) -> bool {
        self.stop_requested
    }
    #[inline(always)]
    pub fn cycles(&self) -> u64 {
        self.cycles_current
    }

    // --- Debugging Helpers ---
    pub fn disassemble_instruction(&self, address: u16, bus: &mut MemoryBus) -> (String, u8) {
        let opcode = bus.read_byte(address);
        if opcode == 0xCB {
            let cb_opcode = bus.read_byte(address.wrapping_add(1));
            let cb_instr = &CB_OPCODES[cb_opcode as usize];
            (cb_instr.mnemonic.to_string(), cb_instr.length)
        } else {
            let instr = &OPCODES[opcode as usize];
            let operand_str = match instr.length {
                2 => {
                    let d8 = bus.read_byte(address.wrapping_add(1));
                    if instr.mnemonic.starts_with("JR")
                        || instr.mnemonic == "ADD SP, r8"
                        || instr.mnemonic == "LD HL, SP+r8"
                    {
                        format!("{:+}", d8 as i8)
                    } else {
                        format!("${:02X}", d8)
                    }
                }
                3 => {
                    let lo = bus.read_byte(address.wrapping_add(1));
                    let hi = bus.read_byte(address.wrapping_add(2));
                    format!("${:04X}", u16::from_le_bytes([lo, hi]))
                }
                _ => String::new(),
            };
            let formatted_mnemonic = instr
                .mnemonic
                .replace("d16", &operand_str)
                .replace("a16", &operand_str)
                .replace("d8", &operand_str)
                .replace("r8", &operand_str)
                .trim_end()
                .to_string();
            (formatted_mnemonic, instr.length)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_with(image: &[u8]) -> (Cpu, MemoryBus) {
        let mut bus = MemoryBus::new();
        bus.load_image(image);
        (Cpu::new(false), bus)
    }

    #[test]
    fn nop_cadence_follows_the_cycle_window() {
        let (mut cpu, mut bus) = machine_with(&[0x00, 0x00, 0x00]);

        for _ in 0..4 {
            cpu.tick(&mut bus).unwrap();
        }
        assert_eq!(cpu.pc(), 1);
        assert_eq!(cpu.cycles(), 4);

        // The 5th tick is the next boundary: the second NOP is fetched and
        // PC moves once more, then holds for the rest of its window.
        cpu.tick(&mut bus).unwrap();
        assert_eq!(cpu.pc(), 2);
        for _ in 0..3 {
            cpu.tick(&mut bus).unwrap();
        }
        assert_eq!(cpu.pc(), 2);
        assert_eq!(cpu.cycles(), 8);
    }

    #[test]
    fn step_consumes_exactly_one_instruction() {
        let (mut cpu, mut bus) = machine_with(&[0x01, 0x34, 0x12]); // LD BC, d16
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 12);
        assert_eq!(cpu.regs().bc(), 0x1234);
        assert_eq!(cpu.pc(), 3);
    }

    #[test]
    fn invalid_opcode_is_fatal_and_idempotent() {
        let (mut cpu, mut bus) = machine_with(&[0x00, 0xD3]);
        cpu.step(&mut bus).unwrap();

        let err = cpu.tick(&mut bus).unwrap_err();
        assert_eq!(err, CpuError::InvalidOpcode { opcode: 0xD3, pc: 1 });
        assert_eq!(cpu.pc(), 1);
        let cycles_after_first_failure = cpu.cycles();

        // Ticking again must not move the machine.
        let err = cpu.tick(&mut bus).unwrap_err();
        assert_eq!(err, CpuError::InvalidOpcode { opcode: 0xD3, pc: 1 });
        assert_eq!(cpu.cycles(), cycles_after_first_failure);
    }

    #[test]
    fn cb_instructions_dispatch_through_the_second_table() {
        // SWAP A with A = 0x12 -> 0x21
        let (mut cpu, mut bus) = machine_with(&[0xCB, 0x37]);
        cpu.regs_mut().set_a(0x12);
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 8);
        assert_eq!(cpu.regs().a(), 0x21);
        assert_eq!(cpu.pc(), 2);
    }

    #[test]
    fn halt_idles_until_an_enabled_interrupt_pends() {
        let (mut cpu, mut bus) = machine_with(&[0x76, 0x00]); // HALT; NOP
        cpu.step(&mut bus).unwrap();
        assert!(cpu.halted());

        // Idle windows elapse without fetching.
        for _ in 0..12 {
            cpu.tick(&mut bus).unwrap();
        }
        assert_eq!(cpu.pc(), 1);
        assert!(cpu.halted());

        // Enabled + pending interrupt wakes the core at the next boundary.
        bus.write_byte(memory_map::INTERRUPT_ENABLE_REGISTER, 0x01);
        bus.write_byte(memory_map::IF_ADDR, 0x01);
        cpu.step(&mut bus).unwrap();
        assert!(!cpu.halted());
        assert_eq!(cpu.pc(), 2);
    }

    #[test]
    fn ei_enables_ime_one_instruction_late() {
        let (mut cpu, mut bus) = machine_with(&[0xFB, 0x00, 0x00]); // EI; NOP; NOP
        cpu.step(&mut bus).unwrap();
        assert!(!cpu.ime());

        cpu.step(&mut bus).unwrap();
        assert!(cpu.ime());
    }

    #[test]
    fn di_cancels_a_scheduled_enable() {
        let (mut cpu, mut bus) = machine_with(&[0xFB, 0xF3, 0x00]); // EI; DI; NOP
        cpu.step(&mut bus).unwrap();
        cpu.step(&mut bus).unwrap();
        assert!(!cpu.ime());
        cpu.step(&mut bus).unwrap();
        assert!(!cpu.ime());
    }

    #[test]
    fn disassembles_operands_from_memory() {
        let (cpu, mut bus) = machine_with(&[0x01, 0x34, 0x12, 0x18, 0xFE, 0xCB, 0x37]);
        let (text, length) = cpu.disassemble_instruction(0, &mut bus);
        assert_eq!(text, "LD BC, $1234");
        assert_eq!(length, 3);

        let (text, length) = cpu.disassemble_instruction(3, &mut bus);
        assert_eq!(text, "JR -2");
        assert_eq!(length, 2);

        let (text, length) = cpu.disassemble_instruction(5, &mut bus);
        assert_eq!(text, "SWAP A");
        assert_eq!(length, 2);
    }
}

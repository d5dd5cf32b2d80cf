use super::{Cpu, CpuError, CpuResult, constants::*};
use crate::instruction::Branch;
use crate::memory_bus::MemoryBus;
use crate::memory_map;

// --- Control Flow Implementations ---
impl Cpu {
    // NOP
    pub fn op_nop(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        Ok(Branch::None)
    }

    // JP a16 / JP HL / JP cc, a16
    // Operand bytes are read relative to the saved instruction address, and
    // are read whether or not the branch is taken.
    fn conditional_jp_a16(
        &mut self,
        condition: bool,
        memory_bus: &mut MemoryBus,
    ) -> CpuResult<Branch> {
        let addr = self.read_d16(memory_bus);
        if condition {
            self.regs.pc = addr;
            Ok(Branch::Taken)
        } else {
            Ok(Branch::None)
        }
    }
    pub fn op_jp_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.pc = self.read_d16(memory_bus);
        Ok(Branch::None)
    }
    pub fn op_jp_hl(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.pc = self.regs.hl();
        Ok(Branch::None)
    }
    pub fn op_jp_nz_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_Z);
        self.conditional_jp_a16(condition, memory_bus)
    }
    pub fn op_jp_z_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_Z);
        self.conditional_jp_a16(condition, memory_bus)
    }
    pub fn op_jp_nc_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_C);
        self.conditional_jp_a16(condition, memory_bus)
    }
    pub fn op_jp_c_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_C);
        self.conditional_jp_a16(condition, memory_bus)
    }

    // JR r8 / JR cc, r8
    // The signed offset applies to the address of the following instruction,
    // which PC already holds when the handler runs.
    fn conditional_jr(&mut self, condition: bool, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let offset = self.read_r8(memory_bus);
        if condition {
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
            Ok(Branch::Taken)
        } else {
            Ok(Branch::None)
        }
    }
    pub fn op_jr_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let offset = self.read_r8(memory_bus);
        self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
        Ok(Branch::None)
    }
    pub fn op_jr_nz_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_Z);
        self.conditional_jr(condition, memory_bus)
    }
    pub fn op_jr_z_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_Z);
        self.conditional_jr(condition, memory_bus)
    }
    pub fn op_jr_nc_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_C);
        self.conditional_jr(condition, memory_bus)
    }
    pub fn op_jr_c_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_C);
        self.conditional_jr(condition, memory_bus)
    }

    // CALL a16 / CALL cc, a16
    fn conditional_call_a16(
        &mut self,
        condition: bool,
        memory_bus: &mut MemoryBus,
    ) -> CpuResult<Branch> {
        let addr = self.read_d16(memory_bus);
        if condition {
            // Push address *after* CALL instruction
            self.push_word(self.regs.pc, memory_bus);
            self.regs.pc = addr;
            Ok(Branch::Taken)
        } else {
            Ok(Branch::None)
        }
    }
    pub fn op_call_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.read_d16(memory_bus);
        self.push_word(self.regs.pc, memory_bus);
        self.regs.pc = addr;
        Ok(Branch::None)
    }
    pub fn op_call_nz_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_Z);
        self.conditional_call_a16(condition, memory_bus)
    }
    pub fn op_call_z_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_Z);
        self.conditional_call_a16(condition, memory_bus)
    }
    pub fn op_call_nc_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_C);
        self.conditional_call_a16(condition, memory_bus)
    }
    pub fn op_call_c_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_C);
        self.conditional_call_a16(condition, memory_bus)
    }

    // RET / RET cc / RETI
    fn conditional_ret(
        &mut self,
        condition: bool,
        memory_bus: &mut MemoryBus,
    ) -> CpuResult<Branch> {
        if condition {
            self.regs.pc = self.pop_word(memory_bus);
            Ok(Branch::Taken)
        } else {
            Ok(Branch::None)
        }
    }
    pub fn op_ret(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.pc = self.pop_word(memory_bus);
        Ok(Branch::None)
    }
    pub fn op_ret_nz(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_Z);
        self.conditional_ret(condition, memory_bus)
    }
    pub fn op_ret_z(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_Z);
        self.conditional_ret(condition, memory_bus)
    }
    pub fn op_ret_nc(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = !self.regs.flag(FLAG_C);
        self.conditional_ret(condition, memory_bus)
    }
    pub fn op_ret_c(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let condition = self.regs.flag(FLAG_C);
        self.conditional_ret(condition, memory_bus)
    }
    // RETI re-enables interrupts immediately, without the EI delay slot.
    pub fn op_reti(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.pc = self.pop_word(memory_bus);
        self.ime = true;
        self.ime_scheduled = false;
        Ok(Branch::None)
    }

    // RST n
    fn rst(&mut self, vector: u16, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.push_word(self.regs.pc, memory_bus);
        self.regs.pc = vector;
        Ok(Branch::None)
    }
    pub fn op_rst_00h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0000, memory_bus)
    }
    pub fn op_rst_08h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0008, memory_bus)
    }
    pub fn op_rst_10h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0010, memory_bus)
    }
    pub fn op_rst_18h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0018, memory_bus)
    }
    pub fn op_rst_20h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0020, memory_bus)
    }
    pub fn op_rst_28h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0028, memory_bus)
    }
    pub fn op_rst_30h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0030, memory_bus)
    }
    pub fn op_rst_38h(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.rst(0x0038, memory_bus)
    }

    // Misc Control
    // DI cancels a pending EI as well as clearing IME itself.
    pub fn op_di(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.ime = false;
        self.ime_scheduled = false;
        Ok(Branch::None)
    }
    // EI takes effect after the following instruction completes.
    pub fn op_ei(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.ime_scheduled = true;
        Ok(Branch::None)
    }
    pub fn op_halt(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let ie = memory_bus.read_byte(memory_map::INTERRUPT_ENABLE_REGISTER);
        let iflags = memory_bus.read_byte(memory_map::IF_ADDR);
        let pending = ie & iflags & memory_map::INTERRUPT_MASK;
        if !self.ime && pending != 0 {
            log::warn!(
                "HALT bug triggered at PC={:#06X}! IME=0, IE&IF={:02X}. Next instruction will execute.",
                self.instruction_pc,
                pending
            );
            // PC already incremented, effectively skipping the halt.
        } else {
            self.halted = true;
        }
        Ok(Branch::None)
    }
    pub fn op_stop(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.stop_requested = true;
        log::warn!(
            "STOP instruction encountered at PC={:#06X}; core idles until reset",
            self.instruction_pc
        );
        Ok(Branch::None)
    }

    // Flags
    pub fn op_scf(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.set_flag(FLAG_N | FLAG_H, false);
        self.regs.set_flag(FLAG_C, true);
        Ok(Branch::None)
    }
    pub fn op_ccf(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        let current_c = self.regs.flag(FLAG_C);
        self.regs.set_flag(FLAG_N | FLAG_H, false);
        self.regs.set_flag(FLAG_C, !current_c);
        Ok(Branch::None)
    }

    // Misc ALU/Data
    pub fn op_cpl(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.a = !self.regs.a;
        self.regs.set_flag(FLAG_N | FLAG_H, true);
        Ok(Branch::None)
    }
    pub fn op_daa(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        let (result, flags) = crate::alu::daa(self.regs.a, self.regs.f);
        self.regs.a = result;
        self.regs.f = flags;
        Ok(Branch::None)
    }

    // --- Invalid Opcode Handler ---
    // The engine restores PC before surfacing the error, so a retried tick
    // reports the same fault against unchanged state.
    pub fn op_invalid(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        Err(CpuError::InvalidOpcode {
            opcode: self.fetched_opcode,
            pc: self.instruction_pc,
        })
    }
}

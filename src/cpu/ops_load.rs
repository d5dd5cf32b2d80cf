use super::{Cpu, CpuResult};
use crate::instruction::Branch;
use crate::memory_bus::MemoryBus;
use crate::memory_map;

// --- Load/Store/Move Implementations ---
impl Cpu {
    // LD rr, d16
    ld_rr_d16!(op_ld_bc_d16, set_bc);
    ld_rr_d16!(op_ld_de_d16, set_de);
    ld_rr_d16!(op_ld_hl_d16, set_hl);
    ld_rr_d16!(op_ld_sp_d16, set_sp);

    // LD r, d8
    ld_r_d8!(op_ld_b_d8, b);
    ld_r_d8!(op_ld_c_d8, c);
    ld_r_d8!(op_ld_d_d8, d);
    ld_r_d8!(op_ld_e_d8, e);
    ld_r_d8!(op_ld_h_d8, h);
    ld_r_d8!(op_ld_l_d8, l);
    ld_r_d8!(op_ld_a_d8, a);

    pub fn op_ld_hlp_d8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let value = self.read_d8(memory_bus);
        memory_bus.write_byte(self.regs.hl(), value);
        Ok(Branch::None)
    }

    // LD r, r' grid, one row per destination (rows 0x40..0x7F)
    ld_r_r!(op_ld_b_b, b, b);
    ld_r_r!(op_ld_b_c, b, c);
    ld_r_r!(op_ld_b_d, b, d);
    ld_r_r!(op_ld_b_e, b, e);
    ld_r_r!(op_ld_b_h, b, h);
    ld_r_r!(op_ld_b_l, b, l);
    ld_r_hlp!(op_ld_b_hlp, b);
    ld_r_r!(op_ld_b_a, b, a);

    ld_r_r!(op_ld_c_b, c, b);
    ld_r_r!(op_ld_c_c, c, c);
    ld_r_r!(op_ld_c_d, c, d);
    ld_r_r!(op_ld_c_e, c, e);
    ld_r_r!(op_ld_c_h, c, h);
    ld_r_r!(op_ld_c_l, c, l);
    ld_r_hlp!(op_ld_c_hlp, c);
    ld_r_r!(op_ld_c_a, c, a);

    ld_r_r!(op_ld_d_b, d, b);
    ld_r_r!(op_ld_d_c, d, c);
    ld_r_r!(op_ld_d_d, d, d);
    ld_r_r!(op_ld_d_e, d, e);
    ld_r_r!(op_ld_d_h, d, h);
    ld_r_r!(op_ld_d_l, d, l);
    ld_r_hlp!(op_ld_d_hlp, d);
    ld_r_r!(op_ld_d_a, d, a);

    ld_r_r!(op_ld_e_b, e, b);
    ld_r_r!(op_ld_e_c, e, c);
    ld_r_r!(op_ld_e_d, e, d);
    ld_r_r!(op_ld_e_e, e, e);
    ld_r_r!(op_ld_e_h, e, h);
    ld_r_r!(op_ld_e_l, e, l);
    ld_r_hlp!(op_ld_e_hlp, e);
    ld_r_r!(op_ld_e_a, e, a);

    ld_r_r!(op_ld_h_b, h, b);
    ld_r_r!(op_ld_h_c, h, c);
    ld_r_r!(op_ld_h_d, h, d);
    ld_r_r!(op_ld_h_e, h, e);
    ld_r_r!(op_ld_h_h, h, h);
    ld_r_r!(op_ld_h_l, h, l);
    ld_r_hlp!(op_ld_h_hlp, h);
    ld_r_r!(op_ld_h_a, h, a);

    ld_r_r!(op_ld_l_b, l, b);
    ld_r_r!(op_ld_l_c, l, c);
    ld_r_r!(op_ld_l_d, l, d);
    ld_r_r!(op_ld_l_e, l, e);
    ld_r_r!(op_ld_l_h, l, h);
    ld_r_r!(op_ld_l_l, l, l);
    ld_r_hlp!(op_ld_l_hlp, l);
    ld_r_r!(op_ld_l_a, l, a);

    ld_hlp_r!(op_ld_hlp_b, b);
    ld_hlp_r!(op_ld_hlp_c, c);
    ld_hlp_r!(op_ld_hlp_d, d);
    ld_hlp_r!(op_ld_hlp_e, e);
    ld_hlp_r!(op_ld_hlp_h, h);
    ld_hlp_r!(op_ld_hlp_l, l);
    ld_hlp_r!(op_ld_hlp_a, a);

    ld_r_r!(op_ld_a_b, a, b);
    ld_r_r!(op_ld_a_c, a, c);
    ld_r_r!(op_ld_a_d, a, d);
    ld_r_r!(op_ld_a_e, a, e);
    ld_r_r!(op_ld_a_h, a, h);
    ld_r_r!(op_ld_a_l, a, l);
    ld_r_hlp!(op_ld_a_hlp, a);
    ld_r_r!(op_ld_a_a, a, a);

    // Accumulator loads through BC/DE
    pub fn op_ld_bc_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        memory_bus.write_byte(self.regs.bc(), self.regs.a);
        Ok(Branch::None)
    }
    pub fn op_ld_de_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        memory_bus.write_byte(self.regs.de(), self.regs.a);
        Ok(Branch::None)
    }
    pub fn op_ld_a_bc(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.a = memory_bus.read_byte(self.regs.bc());
        Ok(Branch::None)
    }
    pub fn op_ld_a_de(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.a = memory_bus.read_byte(self.regs.de());
        Ok(Branch::None)
    }

    // LD (HL+), A / LD (HL-), A and the mirrored reads. HL moves after the
    // transfer, wrapping at the address space edges.
    pub fn op_ld_hli_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.regs.hl();
        memory_bus.write_byte(addr, self.regs.a);
        self.regs.set_hl(addr.wrapping_add(1));
        Ok(Branch::None)
    }
    pub fn op_ld_hld_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.regs.hl();
        memory_bus.write_byte(addr, self.regs.a);
        self.regs.set_hl(addr.wrapping_sub(1));
        Ok(Branch::None)
    }
    pub fn op_ld_a_hli(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.regs.hl();
        self.regs.a = memory_bus.read_byte(addr);
        self.regs.set_hl(addr.wrapping_add(1));
        Ok(Branch::None)
    }
    pub fn op_ld_a_hld(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.regs.hl();
        self.regs.a = memory_bus.read_byte(addr);
        self.regs.set_hl(addr.wrapping_sub(1));
        Ok(Branch::None)
    }

    // LD (a16), SP
    pub fn op_ld_a16_sp(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.read_d16(memory_bus);
        memory_bus.write_word(addr, self.regs.sp);
        Ok(Branch::None)
    }

    // High-page loads: LDH (a8), A / LDH A, (a8) / LD (C), A / LD A, (C)
    pub fn op_ldh_a8_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = memory_map::HIGH_PAGE_START + self.read_d8(memory_bus) as u16;
        memory_bus.write_byte(addr, self.regs.a);
        Ok(Branch::None)
    }
    pub fn op_ldh_a_a8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = memory_map::HIGH_PAGE_START + self.read_d8(memory_bus) as u16;
        self.regs.a = memory_bus.read_byte(addr);
        Ok(Branch::None)
    }
    pub fn op_ld_cp_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = memory_map::HIGH_PAGE_START + self.regs.c as u16;
        memory_bus.write_byte(addr, self.regs.a);
        Ok(Branch::None)
    }
    pub fn op_ld_a_cp(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = memory_map::HIGH_PAGE_START + self.regs.c as u16;
        self.regs.a = memory_bus.read_byte(addr);
        Ok(Branch::None)
    }

    // LD (a16), A / LD A, (a16)
    pub fn op_ld_a16_a(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.read_d16(memory_bus);
        memory_bus.write_byte(addr, self.regs.a);
        Ok(Branch::None)
    }
    pub fn op_ld_a_a16(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.read_d16(memory_bus);
        self.regs.a = memory_bus.read_byte(addr);
        Ok(Branch::None)
    }

    // SP transfers
    pub fn op_ld_sp_hl(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        self.regs.sp = self.regs.hl();
        Ok(Branch::None)
    }
    pub fn op_ld_hl_sp_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let offset = self.read_r8(memory_bus);
        let (result, flags) = crate::alu::add_sp(self.regs.sp, offset);
        self.regs.set_hl(result);
        self.regs.f = flags;
        Ok(Branch::None)
    }

    // PUSH rr / POP rr. POP AF goes through set_af, which keeps the low
    // nibble of F zero no matter what the stack held.
    push_rr!(op_push_bc, bc);
    push_rr!(op_push_de, de);
    push_rr!(op_push_hl, hl);
    push_rr!(op_push_af, af);

    pop_rr!(op_pop_bc, set_bc);
    pop_rr!(op_pop_de, set_de);
    pop_rr!(op_pop_hl, set_hl);
    pop_rr!(op_pop_af, set_af);
}

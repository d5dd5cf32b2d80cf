use super::{Cpu, CpuResult};
use crate::instruction::Branch;
use crate::memory_bus::MemoryBus;

// --- Arithmetic/Logic Implementations ---
impl Cpu {
    // INC r / DEC r
    inc_r!(op_inc_b, b);
    inc_r!(op_inc_c, c);
    inc_r!(op_inc_d, d);
    inc_r!(op_inc_e, e);
    inc_r!(op_inc_h, h);
    inc_r!(op_inc_l, l);
    inc_r!(op_inc_a, a);

    dec_r!(op_dec_b, b);
    dec_r!(op_dec_c, c);
    dec_r!(op_dec_d, d);
    dec_r!(op_dec_e, e);
    dec_r!(op_dec_h, h);
    dec_r!(op_dec_l, l);
    dec_r!(op_dec_a, a);

    // INC (HL) / DEC (HL) are read-modify-write on the bus.
    pub fn op_inc_hlp(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.regs.hl();
        let (result, flags) = crate::alu::inc8(memory_bus.read_byte(addr), self.regs.f);
        memory_bus.write_byte(addr, result);
        self.regs.f = flags;
        Ok(Branch::None)
    }
    pub fn op_dec_hlp(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let addr = self.regs.hl();
        let (result, flags) = crate::alu::dec8(memory_bus.read_byte(addr), self.regs.f);
        memory_bus.write_byte(addr, result);
        self.regs.f = flags;
        Ok(Branch::None)
    }

    // INC rr / DEC rr
    inc_rr!(op_inc_bc, bc, set_bc);
    inc_rr!(op_inc_de, de, set_de);
    inc_rr!(op_inc_hl, hl, set_hl);
    inc_rr!(op_inc_sp, sp, set_sp);

    dec_rr!(op_dec_bc, bc, set_bc);
    dec_rr!(op_dec_de, de, set_de);
    dec_rr!(op_dec_hl, hl, set_hl);
    dec_rr!(op_dec_sp, sp, set_sp);

    // ADD HL, rr
    add_hl_rr!(op_add_hl_bc, bc);
    add_hl_rr!(op_add_hl_de, de);
    add_hl_rr!(op_add_hl_hl, hl);
    add_hl_rr!(op_add_hl_sp, sp);

    // ADD SP, r8
    pub fn op_add_sp_r8(&mut self, memory_bus: &mut MemoryBus) -> CpuResult<Branch> {
        let offset = self.read_r8(memory_bus);
        let (result, flags) = crate::alu::add_sp(self.regs.sp, offset);
        self.regs.set_sp(result);
        self.regs.f = flags;
        Ok(Branch::None)
    }

    // ADD A, x
    alu_a_r!(op_add_a_b, add8, b, false);
    alu_a_r!(op_add_a_c, add8, c, false);
    alu_a_r!(op_add_a_d, add8, d, false);
    alu_a_r!(op_add_a_e, add8, e, false);
    alu_a_r!(op_add_a_h, add8, h, false);
    alu_a_r!(op_add_a_l, add8, l, false);
    alu_a_hlp!(op_add_a_hlp, add8, false);
    alu_a_r!(op_add_a_a, add8, a, false);
    alu_a_d8!(op_add_a_d8, add8, false);

    // ADC A, x
    alu_a_r!(op_adc_a_b, add8, b, true);
    alu_a_r!(op_adc_a_c, add8, c, true);
    alu_a_r!(op_adc_a_d, add8, d, true);
    alu_a_r!(op_adc_a_e, add8, e, true);
    alu_a_r!(op_adc_a_h, add8, h, true);
    alu_a_r!(op_adc_a_l, add8, l, true);
    alu_a_hlp!(op_adc_a_hlp, add8, true);
    alu_a_r!(op_adc_a_a, add8, a, true);
    alu_a_d8!(op_adc_a_d8, add8, true);

    // SUB A, x
    alu_a_r!(op_sub_a_b, sub8, b, false);
    alu_a_r!(op_sub_a_c, sub8, c, false);
    alu_a_r!(op_sub_a_d, sub8, d, false);
    alu_a_r!(op_sub_a_e, sub8, e, false);
    alu_a_r!(op_sub_a_h, sub8, h, false);
    alu_a_r!(op_sub_a_l, sub8, l, false);
    alu_a_hlp!(op_sub_a_hlp, sub8, false);
    alu_a_r!(op_sub_a_a, sub8, a, false);
    alu_a_d8!(op_sub_a_d8, sub8, false);

    // SBC A, x
    alu_a_r!(op_sbc_a_b, sub8, b, true);
    alu_a_r!(op_sbc_a_c, sub8, c, true);
    alu_a_r!(op_sbc_a_d, sub8, d, true);
    alu_a_r!(op_sbc_a_e, sub8, e, true);
    alu_a_r!(op_sbc_a_h, sub8, h, true);
    alu_a_r!(op_sbc_a_l, sub8, l, true);
    alu_a_hlp!(op_sbc_a_hlp, sub8, true);
    alu_a_r!(op_sbc_a_a, sub8, a, true);
    alu_a_d8!(op_sbc_a_d8, sub8, true);

    // AND A, x
    alu_a_r!(op_and_a_b, and8, b);
    alu_a_r!(op_and_a_c, and8, c);
    alu_a_r!(op_and_a_d, and8, d);
    alu_a_r!(op_and_a_e, and8, e);
    alu_a_r!(op_and_a_h, and8, h);
    alu_a_r!(op_and_a_l, and8, l);
    alu_a_hlp!(op_and_a_hlp, and8);
    alu_a_r!(op_and_a_a, and8, a);
    alu_a_d8!(op_and_a_d8, and8);

    // XOR A, x
    alu_a_r!(op_xor_a_b, xor8, b);
    alu_a_r!(op_xor_a_c, xor8, c);
    alu_a_r!(op_xor_a_d, xor8, d);
    alu_a_r!(op_xor_a_e, xor8, e);
    alu_a_r!(op_xor_a_h, xor8, h);
    alu_a_r!(op_xor_a_l, xor8, l);
    alu_a_hlp!(op_xor_a_hlp, xor8);
    alu_a_r!(op_xor_a_a, xor8, a);
    alu_a_d8!(op_xor_a_d8, xor8);

    // OR A, x
    alu_a_r!(op_or_a_b, or8, b);
    alu_a_r!(op_or_a_c, or8, c);
    alu_a_r!(op_or_a_d, or8, d);
    alu_a_r!(op_or_a_e, or8, e);
    alu_a_r!(op_or_a_h, or8, h);
    alu_a_r!(op_or_a_l, or8, l);
    alu_a_hlp!(op_or_a_hlp, or8);
    alu_a_r!(op_or_a_a, or8, a);
    alu_a_d8!(op_or_a_d8, or8);

    // CP A, x leaves A untouched and only updates flags.
    alu_a_r!(op_cp_a_b, cp, b);
    alu_a_r!(op_cp_a_c, cp, c);
    alu_a_r!(op_cp_a_d, cp, d);
    alu_a_r!(op_cp_a_e, cp, e);
    alu_a_r!(op_cp_a_h, cp, h);
    alu_a_r!(op_cp_a_l, cp, l);
    alu_a_hlp!(op_cp_a_hlp, cp);
    alu_a_r!(op_cp_a_a, cp, a);
    alu_a_d8!(op_cp_a_d8, cp);
}

use super::{Cpu, CpuResult};
use crate::instruction::Branch;
use crate::memory_bus::MemoryBus;

// --- Rotate/Shift Implementations (Non-CB prefixed) ---
// These four always clear Z, unlike their CB-prefixed counterparts.
impl Cpu {
    // RLCA
    pub fn op_rlca(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        let (result, flags) = crate::alu::rlca(self.regs.a);
        self.regs.a = result;
        self.regs.f = flags;
        Ok(Branch::None)
    }
    // RLA
    pub fn op_rla(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        let (result, flags) = crate::alu::rla(self.regs.a, self.regs.f);
        self.regs.a = result;
        self.regs.f = flags;
        Ok(Branch::None)
    }
    // RRCA
    pub fn op_rrca(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        let (result, flags) = crate::alu::rrca(self.regs.a);
        self.regs.a = result;
        self.regs.f = flags;
        Ok(Branch::None)
    }
    // RRA
    pub fn op_rra(&mut self, _bus: &mut MemoryBus) -> CpuResult<Branch> {
        let (result, flags) = crate::alu::rra(self.regs.a, self.regs.f);
        self.regs.a = result;
        self.regs.f = flags;
        Ok(Branch::None)
    }
}

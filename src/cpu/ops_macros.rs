// --- LD Macros ---
macro_rules! ld_r_r {
    ($name:ident, $dst:ident, $src:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            self.regs.$dst = self.regs.$src;
            Ok(Branch::None)
        }
    };
}
macro_rules! ld_r_hlp {
    ($name:ident, $dst:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            self.regs.$dst = bus.read_byte(self.regs.hl());
            Ok(Branch::None)
        }
    };
}
macro_rules! ld_hlp_r {
    ($name:ident, $src:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            bus.write_byte(self.regs.hl(), self.regs.$src);
            Ok(Branch::None)
        }
    };
}
macro_rules! ld_r_d8 {
    ($name:ident, $dst:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            self.regs.$dst = self.read_d8(bus);
            Ok(Branch::None)
        }
    };
}
macro_rules! ld_rr_d16 {
    ($name:ident, $set:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = self.read_d16(bus);
            self.regs.$set(value);
            Ok(Branch::None)
        }
    };
}

// --- Stack Macros ---
macro_rules! push_rr {
    ($name:ident, $get:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = self.regs.$get();
            self.push_word(value, bus);
            Ok(Branch::None)
        }
    };
}
macro_rules! pop_rr {
    ($name:ident, $set:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = self.pop_word(bus);
            self.regs.$set(value);
            Ok(Branch::None)
        }
    };
}

// --- ALU Macros ---
// Three operand shapes share one name: CP discards the result, ADD/ADC and
// SUB/SBC thread the carry flag, the bitwise ops take just the two bytes.
macro_rules! alu_a_r {
    ($name:ident, cp, $src:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (_, flags) = crate::alu::sub8(self.regs.a, self.regs.$src, self.regs.f, false);
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident, $src:ident, $carry:expr) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::$op(self.regs.a, self.regs.$src, self.regs.f, $carry);
            self.regs.a = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident, $src:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::$op(self.regs.a, self.regs.$src);
            self.regs.a = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
}
macro_rules! alu_a_hlp {
    ($name:ident, cp) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = bus.read_byte(self.regs.hl());
            let (_, flags) = crate::alu::sub8(self.regs.a, value, self.regs.f, false);
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident, $carry:expr) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = bus.read_byte(self.regs.hl());
            let (result, flags) = crate::alu::$op(self.regs.a, value, self.regs.f, $carry);
            self.regs.a = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = bus.read_byte(self.regs.hl());
            let (result, flags) = crate::alu::$op(self.regs.a, value);
            self.regs.a = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
}
macro_rules! alu_a_d8 {
    ($name:ident, cp) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = self.read_d8(bus);
            let (_, flags) = crate::alu::sub8(self.regs.a, value, self.regs.f, false);
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident, $carry:expr) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = self.read_d8(bus);
            let (result, flags) = crate::alu::$op(self.regs.a, value, self.regs.f, $carry);
            self.regs.a = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident) => {
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = self.read_d8(bus);
            let (result, flags) = crate::alu::$op(self.regs.a, value);
            self.regs.a = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
}
macro_rules! inc_r {
    ($name:ident, $r:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::inc8(self.regs.$r, self.regs.f);
            self.regs.$r = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
}
macro_rules! dec_r {
    ($name:ident, $r:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::dec8(self.regs.$r, self.regs.f);
            self.regs.$r = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
}
// 16-bit INC/DEC touch no flags.
macro_rules! inc_rr {
    ($name:ident, $get:ident, $set:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let value = self.regs.$get().wrapping_add(1);
            self.regs.$set(value);
            Ok(Branch::None)
        }
    };
}
macro_rules! dec_rr {
    ($name:ident, $get:ident, $set:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let value = self.regs.$get().wrapping_sub(1);
            self.regs.$set(value);
            Ok(Branch::None)
        }
    };
}
macro_rules! add_hl_rr {
    ($name:ident, $get:ident) => {
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::add16(self.regs.hl(), self.regs.$get(), self.regs.f);
            self.regs.set_hl(result);
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
}

// --- CB Macros ---
macro_rules! cb_reg_op {
    ($name:ident, $op:ident, $reg:ident) => { // Rotate/shift/swap
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::$op(self.regs.$reg);
            self.regs.$reg = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident, $reg:ident, carry) => { // Rotate through carry
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            let (result, flags) = crate::alu::$op(self.regs.$reg, self.regs.f);
            self.regs.$reg = result;
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, bit, $bit:expr, $reg:ident) => { // BIT op
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            self.regs.f = crate::alu::bit8($bit, self.regs.$reg, self.regs.f);
            Ok(Branch::None)
        }
    };
    ($name:ident, res, $bit:expr, $reg:ident) => { // RES op
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            self.regs.$reg &= !(1 << $bit);
            Ok(Branch::None)
        }
    };
    ($name:ident, set, $bit:expr, $reg:ident) => { // SET op
        #[inline(always)]
        pub fn $name(
            &mut self,
            _bus: &mut crate::memory_bus::MemoryBus,
        ) -> super::CpuResult<Branch> {
            self.regs.$reg |= 1 << $bit;
            Ok(Branch::None)
        }
    };
}
macro_rules! cb_hlp_op {
    ($name:ident, $op:ident) => { // Rotate/shift/swap on (HL)
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let addr = self.regs.hl();
            let value = bus.read_byte(addr);
            let (result, flags) = crate::alu::$op(value);
            bus.write_byte(addr, result);
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, $op:ident, carry) => { // Rotate through carry on (HL)
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let addr = self.regs.hl();
            let value = bus.read_byte(addr);
            let (result, flags) = crate::alu::$op(value, self.regs.f);
            bus.write_byte(addr, result);
            self.regs.f = flags;
            Ok(Branch::None)
        }
    };
    ($name:ident, bit, $bit:expr) => { // BIT op on (HL)
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let value = bus.read_byte(self.regs.hl());
            self.regs.f = crate::alu::bit8($bit, value, self.regs.f);
            Ok(Branch::None)
        }
    };
    ($name:ident, res, $bit:expr) => { // RES op on (HL)
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let addr = self.regs.hl();
            let value = bus.read_byte(addr);
            bus.write_byte(addr, value & !(1 << $bit));
            Ok(Branch::None)
        }
    };
    ($name:ident, set, $bit:expr) => { // SET op on (HL)
        pub fn $name(&mut self, bus: &mut crate::memory_bus::MemoryBus) -> super::CpuResult<Branch> {
            let addr = self.regs.hl();
            let value = bus.read_byte(addr);
            bus.write_byte(addr, value | (1 << $bit));
            Ok(Branch::None)
        }
    };
}

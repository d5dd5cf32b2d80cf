//! A cycle-stepped Sharp LR35902 (Game Boy) CPU core.
//!
//! The crate wires a register file, a flat 64 KiB address space with MMIO
//! intercept registration, and a table-driven instruction engine behind a
//! single `tick` operation. Hosts own the loop: build a
//! [`memory_bus::MemoryBus`], load a program image, build a [`cpu::Cpu`],
//! and tick until done.

pub mod alu;
pub mod cartridge;
pub mod cpu;
pub mod emu;
pub mod instruction;
pub mod memory_bus;
pub mod memory_map;
pub mod registers;

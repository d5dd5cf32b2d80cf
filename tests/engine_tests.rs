//! Engine-level tests: tick cadence, branch timing, the delayed IME latch,
//! halt/stop parking, fault reporting, and host-loop wiring.

use matcha::cpu::{Cpu, CpuError};
use matcha::emu::EmuContext;
use matcha::memory_bus::{MemoryBus, MmioDevice};
use matcha::memory_map;

/// Machine with `program` at 0x0000 and a zeroed register file.
fn machine(program: &[u8]) -> (Cpu, MemoryBus) {
    let mut bus = MemoryBus::new();
    bus.load_image(program);
    (Cpu::new(false), bus)
}

/// Tick until the CPU halts, with a safety bound.
fn run_until_halt(cpu: &mut Cpu, bus: &mut MemoryBus) -> u64 {
    let mut ticks = 0;
    while !cpu.halted() && ticks < 100_000 {
        cpu.tick(bus).unwrap();
        ticks += 1;
    }
    assert!(cpu.halted(), "program did not halt");
    ticks
}

#[test]
fn tick_cadence_holds_pc_until_the_window_closes() {
    let (mut cpu, mut bus) = machine(&[0x00, 0x00, 0x76]); // NOP; NOP; HALT

    for _ in 0..4 {
        cpu.tick(&mut bus).unwrap();
    }
    assert_eq!(cpu.pc(), 1);
    assert_eq!(cpu.cycles(), 4);

    // The fifth tick is the next boundary: the second NOP is fetched.
    cpu.tick(&mut bus).unwrap();
    assert_eq!(cpu.pc(), 2);

    for _ in 0..3 {
        cpu.tick(&mut bus).unwrap();
    }
    assert_eq!(cpu.pc(), 2);
    assert_eq!(cpu.cycles(), 8);
}

#[test]
fn step_returns_the_cycle_cost_of_each_instruction() {
    let (mut cpu, mut bus) = machine(&[0x01, 0x34, 0x12, 0x00, 0x76]); // LD BC,d16; NOP; HALT

    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.pc(), 3);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.pc(), 4);
}

#[test]
fn jr_costs_extra_only_when_taken() {
    // XOR A sets Z, so JR Z is taken and JR NZ is not.
    let (mut cpu, mut bus) = machine(&[
        0xAF, // XOR A
        0x28, 0x00, // JR Z, +0   (taken: 12)
        0x20, 0x00, // JR NZ, +0  (not taken: 8)
        0x76, // HALT
    ]);

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.step(&mut bus).unwrap(), 8);
}

#[test]
fn jp_costs_extra_only_when_taken() {
    let mut program = vec![0u8; 0x09];
    program[0x00] = 0xAF; // XOR A
    program[0x01..0x04].copy_from_slice(&[0xC2, 0x00, 0x20]); // JP NZ, 0x2000 (not taken: 12)
    program[0x04..0x07].copy_from_slice(&[0xCA, 0x08, 0x00]); // JP Z, 0x0008  (taken: 16)
    program[0x07] = 0x76; // HALT (skipped)
    program[0x08] = 0x76; // HALT
    let (mut cpu, mut bus) = machine(&program);

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.step(&mut bus).unwrap(), 16);
    assert_eq!(cpu.pc(), 0x0008);
}

#[test]
fn call_and_ret_timing_depends_on_the_branch() {
    let mut program = vec![0u8; 0x0D];
    program[0x00..0x03].copy_from_slice(&[0x31, 0xFE, 0xFF]); // LD SP, 0xFFFE (12)
    program[0x03] = 0xAF; // XOR A (4)
    program[0x04..0x07].copy_from_slice(&[0xC4, 0x00, 0x10]); // CALL NZ (not taken: 12)
    program[0x07] = 0xC0; // RET NZ (not taken: 8)
    program[0x08..0x0B].copy_from_slice(&[0xCC, 0x0C, 0x00]); // CALL Z, 0x000C (taken: 24)
    program[0x0B] = 0x76; // HALT, the return target
    program[0x0C] = 0xC8; // RET Z (taken: 20)
    let (mut cpu, mut bus) = machine(&program);

    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.step(&mut bus).unwrap(), 8);
    assert_eq!(cpu.step(&mut bus).unwrap(), 24);
    assert_eq!(cpu.step(&mut bus).unwrap(), 20);

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.pc(), 0x000C);
    assert_eq!(cpu.sp(), 0xFFFE);
}

#[test]
fn ei_lands_after_the_following_instruction() {
    let (mut cpu, mut bus) = machine(&[0xFB, 0x00, 0x76]); // EI; NOP; HALT

    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime(), "EI must not take effect immediately");
    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime(), "IME latches after the instruction following EI");
}

#[test]
fn reti_enables_ime_immediately() {
    let mut program = vec![0u8; 0x11];
    program[0x00..0x03].copy_from_slice(&[0x31, 0xFE, 0xFF]); // LD SP, 0xFFFE
    program[0x03..0x06].copy_from_slice(&[0xCD, 0x10, 0x00]); // CALL 0x0010
    program[0x06] = 0x76; // HALT
    program[0x10] = 0xD9; // RETI
    let (mut cpu, mut bus) = machine(&program);

    cpu.step(&mut bus).unwrap(); // LD SP
    cpu.step(&mut bus).unwrap(); // CALL
    assert!(!cpu.ime());
    cpu.step(&mut bus).unwrap(); // RETI
    assert!(cpu.ime());
    assert_eq!(cpu.pc(), 0x0006);
}

#[test]
fn halt_parks_until_an_interrupt_pends() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x01, // LD A, 1
        0xE0, 0xFF, // LDH (0xFF), A  -> IE = 0x01
        0x76, // HALT
        0x04, // INC B
        0x3E, 0x00, // LD A, 0
        0xE0, 0x0F, // LDH (0x0F), A  -> IF = 0x00
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.pc(), 5);

    // Nothing pending: the core idles in place.
    for _ in 0..40 {
        cpu.tick(&mut bus).unwrap();
    }
    assert!(cpu.halted());
    assert_eq!(cpu.regs().b(), 0);

    // An external device raises VBlank. The wake boundary fetches and runs
    // the INC B that follows the HALT, so B flips on the same tick the core
    // leaves the halt state.
    bus.write_byte(memory_map::IF_ADDR, 0x01);
    let mut waited = 0;
    while cpu.halted() && waited < 8 {
        cpu.tick(&mut bus).unwrap();
        waited += 1;
    }
    assert!(!cpu.halted(), "pending interrupt did not wake the core");
    assert_eq!(cpu.regs().b(), 1);

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.pc(), 11);
}

#[test]
fn stop_parks_the_machine_for_good() {
    let (mut cpu, mut bus) = machine(&[0x10, 0x00, 0x04, 0x76]); // STOP; INC B; HALT

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert!(cpu.stopped());
    assert_eq!(cpu.pc(), 2);

    // Idle windows keep consuming ticks but never fetch again.
    let before = cpu.cycles();
    for _ in 0..40 {
        cpu.tick(&mut bus).unwrap();
    }
    assert_eq!(cpu.regs().b(), 0);
    assert_eq!(cpu.pc(), 2);
    assert_eq!(cpu.cycles(), before + 40);
}

#[test]
fn invalid_opcode_is_fatal_idempotent_and_precise() {
    let (mut cpu, mut bus) = machine(&[0x00, 0xD3]); // NOP; invalid

    for _ in 0..4 {
        cpu.tick(&mut bus).unwrap();
    }
    let err = cpu.tick(&mut bus).unwrap_err();
    assert_eq!(
        err,
        CpuError::InvalidOpcode {
            opcode: 0xD3,
            pc: 0x0001
        }
    );
    assert_eq!(cpu.pc(), 0x0001);
    assert_eq!(cpu.cycles(), 4);

    // A retry reports the identical fault against unchanged state.
    let err = cpu.tick(&mut bus).unwrap_err();
    assert_eq!(
        err,
        CpuError::InvalidOpcode {
            opcode: 0xD3,
            pc: 0x0001
        }
    );
    assert_eq!(cpu.cycles(), 4);
}

#[test]
fn store16_wraps_at_the_top_of_the_address_space() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0xCD, 0xAB, // LD SP, 0xABCD
        0x08, 0xFF, 0xFF, // LD (0xFFFF), SP
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.read_byte(0xFFFF), 0xCD);
    assert_eq!(bus.read_byte(0x0000), 0xAB);
}

#[test]
fn post_boot_profile_starts_at_the_entry_point() {
    let mut image = vec![0u8; 0x0103];
    image[0x0100] = 0x3E; // LD A, 0x42
    image[0x0101] = 0x42;
    image[0x0102] = 0x76; // HALT
    let mut bus = MemoryBus::new();
    bus.load_image(&image);
    let mut cpu = Cpu::new(true);
    Cpu::initialize_post_boot_io(&mut bus);

    assert_eq!(cpu.pc(), 0x0100);
    assert_eq!(cpu.sp(), 0xFFFE);
    assert_eq!(cpu.regs().af(), 0x01B0);
    assert_eq!(bus.read_byte(memory_map::IF_ADDR), 0xE1);
    assert_eq!(bus.read_byte(memory_map::INTERRUPT_ENABLE_REGISTER), 0x00);

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.regs().a(), 0x42);
}

struct ConstantPort;

impl MmioDevice for ConstantPort {
    fn read(&mut self, _addr: u16) -> u8 {
        0x7F
    }
    fn write(&mut self, _addr: u16, _value: u8) {}
}

#[test]
fn mmio_devices_intercept_cpu_loads() {
    let (mut cpu, mut bus) = machine(&[0xF0, 0x42, 0x76]); // LDH A, (0x42); HALT
    bus.register_device(0xFF42, 0xFF42, Box::new(ConstantPort));

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x7F);
}

#[test]
fn a_host_loop_drives_the_machine_through_the_run_context() {
    let (mut cpu, mut bus) = machine(&[0x00, 0x76]); // NOP; HALT
    let mut context = EmuContext::new();

    while context.running && !context.paused {
        cpu.tick(&mut bus).unwrap();
        context.ticks += 1;
        if cpu.halted() || cpu.stopped() {
            context.running = false;
        }
        assert!(context.ticks < 1_000, "runaway loop");
    }

    // Four NOP ticks plus the boundary tick that executed HALT.
    assert_eq!(context.ticks, 5);
    assert!(!context.running);
}

//! Instruction-level tests that drive whole byte programs through the tick
//! engine and assert on the architectural state left behind.

use matcha::cpu::{Cpu, FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use matcha::memory_bus::MemoryBus;

/// Machine with `program` at 0x0000 and a zeroed register file, so execution
/// starts at the first program byte.
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
fn nop_then_halt() {
    let (mut cpu, mut bus) = machine(&[0x00, 0x76]); // NOP; HALT

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.pc(), 0x0002);
}

#[test]
fn ld_a_d8() {
    let (mut cpu, mut bus) = machine(&[0x3E, 0x42, 0x76]); // LD A, 0x42; HALT

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x42);
}

#[test]
fn ld_bc_d16_is_little_endian() {
    let (mut cpu, mut bus) = machine(&[0x01, 0x34, 0x12, 0x76]); // LD BC, 0x1234; HALT

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().bc(), 0x1234);
}

#[test]
fn register_copies_ripple_through_the_file() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x5A, // LD A, 0x5A
        0x47, // LD B, A
        0x48, // LD C, B
        0x51, // LD D, C
        0x5A, // LD E, D
        0x63, // LD H, E
        0x6C, // LD L, H
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().b(), 0x5A);
    assert_eq!(cpu.regs().c(), 0x5A);
    assert_eq!(cpu.regs().d(), 0x5A);
    assert_eq!(cpu.regs().e(), 0x5A);
    assert_eq!(cpu.regs().h(), 0x5A);
    assert_eq!(cpu.regs().l(), 0x5A);
}

#[test]
fn memory_round_trip_through_hl() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x80, // LD HL, 0x8000
        0x36, 0x99, // LD (HL), 0x99
        0x7E, // LD A, (HL)
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x99);
    assert_eq!(bus.read_byte(0x8000), 0x99);
}

#[test]
fn hl_moves_after_post_increment_and_post_decrement() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x90, // LD HL, 0x9000
        0x3E, 0xAB, // LD A, 0xAB
        0x22, // LD (HL+), A   -> [0x9000], HL = 0x9001
        0x32, // LD (HL-), A   -> [0x9001], HL = 0x9000
        0x3E, 0x00, // LD A, 0x00
        0x2A, // LD A, (HL+)   -> A = [0x9000], HL = 0x9001
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.read_byte(0x9000), 0xAB);
    assert_eq!(bus.read_byte(0x9001), 0xAB);
    assert_eq!(cpu.regs().a(), 0xAB);
    assert_eq!(cpu.regs().hl(), 0x9001);
}

#[test]
fn push_stores_high_byte_first_and_pop_restores() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0xFE, 0xFF, // LD SP, 0xFFFE
        0x01, 0x34, 0x12, // LD BC, 0x1234
        0xC5, // PUSH BC
        0x01, 0x00, 0x00, // LD BC, 0x0000
        0xD1, // POP DE
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().de(), 0x1234);
    assert_eq!(cpu.sp(), 0xFFFE);
    assert_eq!(bus.read_byte(0xFFFD), 0x12);
    assert_eq!(bus.read_byte(0xFFFC), 0x34);
}

#[test]
fn pop_af_masks_the_flag_low_nibble() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0x00, 0xC1, // LD SP, 0xC100
        0xF1, // POP AF
        0x76, // HALT
    ]);
    // Stacked image of AF with junk in the low nibble of F.
    bus.write_byte(0xC100, 0xFF);
    bus.write_byte(0xC101, 0x12);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x12);
    assert_eq!(cpu.regs().f(), 0xF0);
    assert_eq!(cpu.regs().af(), 0x12F0);
    assert_eq!(cpu.sp(), 0xC102);
}

#[test]
fn high_page_loads_reach_0xff00_plus_offset() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x77, // LD A, 0x77
        0xE0, 0x80, // LDH (0x80), A      -> [0xFF80]
        0x0E, 0x81, // LD C, 0x81
        0x3E, 0x55, // LD A, 0x55
        0xE2, // LD (C), A          -> [0xFF81]
        0x3E, 0x00, // LD A, 0x00
        0xF0, 0x80, // LDH A, (0x80)
        0x47, // LD B, A
        0xF2, // LD A, (C)
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.read_byte(0xFF80), 0x77);
    assert_eq!(bus.read_byte(0xFF81), 0x55);
    assert_eq!(cpu.regs().b(), 0x77);
    assert_eq!(cpu.regs().a(), 0x55);
}

#[test]
fn absolute_addressing_round_trip() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x42, // LD A, 0x42
        0xEA, 0x23, 0xC1, // LD (0xC123), A
        0x3E, 0x00, // LD A, 0x00
        0xFA, 0x23, 0xC1, // LD A, (0xC123)
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x42);
    assert_eq!(bus.read_byte(0xC123), 0x42);
}

#[test]
fn ld_a16_sp_stores_both_bytes() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0xEF, 0xBE, // LD SP, 0xBEEF
        0x08, 0x00, 0xC0, // LD (0xC000), SP
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.read_byte(0xC000), 0xEF);
    assert_eq!(bus.read_byte(0xC001), 0xBE);
}

#[test]
fn add_sets_half_carry_on_low_nibble_overflow() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x0F, // LD A, 0x0F
        0xC6, 0x01, // ADD A, 0x01
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x10);
    assert!(cpu.regs().flag(FLAG_H));
    assert!(!cpu.regs().flag(FLAG_Z));
    assert!(!cpu.regs().flag(FLAG_N));
    assert!(!cpu.regs().flag(FLAG_C));
}

#[test]
fn cp_sets_flags_without_touching_a() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x42, // LD A, 0x42
        0xFE, 0x42, // CP 0x42
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x42);
    assert!(cpu.regs().flag(FLAG_Z));
    assert!(cpu.regs().flag(FLAG_N));
}

#[test]
fn daa_corrects_bcd_addition() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x19, // LD A, 0x19
        0xC6, 0x28, // ADD A, 0x28  -> 0x41 with H set
        0x27, // DAA          -> 0x47
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x47);
    assert!(!cpu.regs().flag(FLAG_C));
}

#[test]
fn add_hl_reports_half_carry_from_bit_11() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0xFF, 0x0F, // LD HL, 0x0FFF
        0x01, 0x01, 0x00, // LD BC, 0x0001
        0x09, // ADD HL, BC
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().hl(), 0x1000);
    assert!(cpu.regs().flag(FLAG_H));
    assert!(!cpu.regs().flag(FLAG_C));
    assert!(!cpu.regs().flag(FLAG_N));
}

#[test]
fn inc_and_dec_operate_on_memory_through_hl() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x80, // LD HL, 0x8000
        0x36, 0xFF, // LD (HL), 0xFF
        0x34, // INC (HL)  -> 0x00, Z and H set
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.read_byte(0x8000), 0x00);
    assert!(cpu.regs().flag(FLAG_Z));
    assert!(cpu.regs().flag(FLAG_H));
}

#[test]
fn jr_nz_loops_until_the_counter_hits_zero() {
    let (mut cpu, mut bus) = machine(&[
        0x06, 0x03, // LD B, 3
        0x05, // DEC B
        0x20, 0xFD, // JR NZ, -3  -> back to DEC B
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().b(), 0);
    assert!(cpu.regs().flag(FLAG_Z));
    assert_eq!(cpu.pc(), 0x0006);
}

#[test]
fn call_pushes_the_return_address_and_ret_resumes() {
    let mut program = vec![0u8; 0x20];
    program[0x00..0x03].copy_from_slice(&[0x31, 0xFE, 0xFF]); // LD SP, 0xFFFE
    program[0x03..0x06].copy_from_slice(&[0xCD, 0x10, 0x00]); // CALL 0x0010
    program[0x06..0x08].copy_from_slice(&[0x3E, 0x2A]); // LD A, 0x2A
    program[0x08] = 0x76; // HALT
    program[0x10] = 0x04; // INC B
    program[0x11] = 0xC9; // RET
    let (mut cpu, mut bus) = machine(&program);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().b(), 1);
    assert_eq!(cpu.regs().a(), 0x2A);
    assert_eq!(cpu.sp(), 0xFFFE);
    // Return address 0x0006 sat at the top of the stack during the call.
    assert_eq!(bus.read_byte(0xFFFD), 0x00);
    assert_eq!(bus.read_byte(0xFFFC), 0x06);
}

#[test]
fn rst_jumps_to_its_fixed_vector() {
    let mut program = vec![0u8; 0x10];
    program[0x00..0x03].copy_from_slice(&[0x31, 0xFE, 0xFF]); // LD SP, 0xFFFE
    program[0x03] = 0xCF; // RST 08h
    program[0x04] = 0x76; // HALT
    program[0x08] = 0x3C; // INC A
    program[0x09] = 0xC9; // RET
    let (mut cpu, mut bus) = machine(&program);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 1);
    assert_eq!(cpu.pc(), 0x0005);
}

#[test]
fn jp_hl_transfers_control_to_the_register_target() {
    let mut program = vec![0u8; 0x24];
    program[0x00..0x03].copy_from_slice(&[0x21, 0x20, 0x00]); // LD HL, 0x0020
    program[0x03] = 0xE9; // JP HL
    program[0x04] = 0x76; // HALT (skipped)
    program[0x20..0x22].copy_from_slice(&[0x3E, 0x99]); // LD A, 0x99
    program[0x22] = 0x76; // HALT
    let (mut cpu, mut bus) = machine(&program);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x99);
    assert_eq!(cpu.pc(), 0x0023);
}

#[test]
fn cb_bit_twiddling_on_the_accumulator() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x0F, // LD A, 0x0F
        0xCB, 0x37, // SWAP A     -> 0xF0
        0xCB, 0x7F, // BIT 7, A   -> Z clear (bit is set)
        0xCB, 0xBF, // RES 7, A   -> 0x70
        0xCB, 0xC7, // SET 0, A   -> 0x71
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x71);
    assert!(!cpu.regs().flag(FLAG_Z));
    assert!(cpu.regs().flag(FLAG_H));
}

#[test]
fn cb_rotates_memory_through_hl() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x80, // LD HL, 0x8000
        0x36, 0x81, // LD (HL), 0x81
        0xCB, 0x06, // RLC (HL)  -> 0x03, carry set
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.read_byte(0x8000), 0x03);
    assert!(cpu.regs().flag(FLAG_C));
}

#[test]
fn accumulator_rotates_clear_z_and_thread_carry() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x80, // LD A, 0x80
        0x07, // RLCA  -> 0x01, C set
        0x1F, // RRA   -> carry into bit 7: 0x80, C set again
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().a(), 0x80);
    assert!(cpu.regs().flag(FLAG_C));
    assert!(!cpu.regs().flag(FLAG_Z));
}

#[test]
fn sp_relative_arithmetic_uses_low_byte_carries() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0xF8, 0xFF, // LD SP, 0xFFF8
        0xF8, 0x08, // LD HL, SP+0x08  -> 0x0000, H and C from low byte
        0xE8, 0xF8, // ADD SP, -8      -> 0xFFF0
        0x76, // HALT
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs().hl(), 0x0000);
    assert_eq!(cpu.sp(), 0xFFF0);
    assert!(!cpu.regs().flag(FLAG_Z));
}

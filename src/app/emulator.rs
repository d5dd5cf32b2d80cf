use matcha::cartridge::{self, CartridgeError, Header};
use matcha::cpu::{Cpu, CpuError};
use matcha::emu::EmuContext;
use matcha::memory_bus::MemoryBus;
use matcha::memory_map;
use std::path::Path;

/// The wired-up machine: CPU, address space, and run-control context.
pub struct Emulator {
    pub cpu: Cpu,
    pub memory_bus: MemoryBus,
    pub context: EmuContext,
}

impl Emulator {
    /// Loads the image at `path` and builds a post-boot machine around it.
    pub fn new(image_path: &Path, skip_boot_rom: bool) -> Result<Self, CartridgeError> {
        println!("Loading image: {}", image_path.display());
        let image = cartridge::read_image(image_path)?;
        println!("Image loaded successfully ({} bytes)", image.len());

        match Header::parse(&image) {
            Some(header) => println!(
                "Header: title={:?} type={:#04X} rom={:#04X} ram={:#04X} checksum={}",
                header.title,
                header.cartridge_type,
                header.rom_size_code,
                header.ram_size_code,
                if header.checksum_valid { "ok" } else { "MISMATCH" },
            ),
            None => println!("Image carries no header (raw test image)"),
        }

        println!("Initializing memory bus...");
        let mut memory_bus = MemoryBus::new();
        memory_bus.load_image(&image);

        println!("Initializing CPU (skip_boot_rom={})...", skip_boot_rom);
        let cpu = Cpu::new(skip_boot_rom);
        if skip_boot_rom {
            Cpu::initialize_post_boot_io(&mut memory_bus);
        }

        Ok(Emulator {
            cpu,
            memory_bus,
            context: EmuContext::new(),
        })
    }

    /// Drives the machine until the context stops it, the CPU parks itself
    /// with no way to wake, or a fault surfaces. Returns total ticks driven.
    pub fn run(&mut self) -> Result<u64, CpuError> {
        while self.context.running && !self.context.paused {
            self.cpu.tick(&mut self.memory_bus)?;
            self.context.ticks += 1;

            if self.cpu.stopped() {
                println!("CPU stopped at PC={:#06X}", self.cpu.pc());
                self.context.running = false;
            } else if self.cpu.halted() && !self.interrupt_pending() {
                // Headless there is no device left to raise a flag, so a
                // halt with nothing pending can never wake.
                println!("CPU halted at PC={:#06X} with no pending interrupt", self.cpu.pc());
                self.context.running = false;
            }
        }
        Ok(self.context.ticks)
    }

    fn interrupt_pending(&mut self) -> bool {
        let enabled = self
            .memory_bus
            .read_byte(memory_map::INTERRUPT_ENABLE_REGISTER);
        let requested = self.memory_bus.read_byte(memory_map::IF_ADDR);
        enabled & requested & memory_map::INTERRUPT_MASK != 0
    }

    /// Stderr register dump for fatal faults.
    pub fn dump_state(&mut self) {
        let (disasm, _) = self
            .cpu
            .disassemble_instruction(self.cpu.pc(), &mut self.memory_bus);
        eprintln!("--- CPU state ---");
        eprintln!(
            "PC={:#06X} SP={:#06X} cycles={}",
            self.cpu.pc(),
            self.cpu.sp(),
            self.cpu.cycles()
        );
        eprintln!("{:?}", self.cpu.regs());
        eprintln!("next: {}", disasm);
    }
}

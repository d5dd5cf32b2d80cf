use std::{env, path::Path, process};

// Declare modules located within the src/app/ directory
mod emulator;

use emulator::Emulator;

fn main() {
    // --- Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        process::exit(1);
    }
    let image_path = Path::new(&args[1]);

    // --- Setup Emulator ---
    let mut emulator = match Emulator::new(image_path, true) {
        Ok(emulator) => emulator,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            process::exit(1);
        }
    };

    // --- Main Loop ---
    println!("Starting main loop...");
    match emulator.run() {
        Ok(ticks) => {
            println!(
                "Emulator stopped after {} ticks ({} cycles, PC={:#06X})",
                ticks,
                emulator.cpu.cycles(),
                emulator.cpu.pc()
            );
        }
        Err(e) => {
            eprintln!("Emulator Error: {}", e);
            emulator.dump_state();
            process::exit(1);
        }
    }
}

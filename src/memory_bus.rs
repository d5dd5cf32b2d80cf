use std::fmt;

use crate::memory_map::ADDRESS_SPACE_SIZE;

/// A peripheral mapped over a range of the address space.
///
/// Reads may have side effects on real hardware (latching, acknowledge),
/// so both accessors take `&mut self`.
pub trait MmioDevice {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
}

struct MmioRange {
    start: u16,
    end: u16,
    device: Box<dyn MmioDevice>,
}

impl MmioRange {
    fn contains(&self, addr: u16) -> bool {
        self.start <= addr && addr <= self.end
    }
}

/// The full 16-bit address space as one flat byte array.
///
/// ## Simplifications:
/// - No bank switching and no region decoding; a program image is copied
///   in verbatim and every address is plain RAM unless a device claims it.
/// - Echo RAM, OAM access restrictions and other PPU-era quirks are not
///   modeled here; peripherals that need special behavior register an
///   `MmioDevice` over their range instead.
pub struct MemoryBus {
    memory: Box<[u8; ADDRESS_SPACE_SIZE]>,
    devices: Vec<MmioRange>,
}

impl MemoryBus {
    /// Creates a new `MemoryBus` with all 64 KiB zeroed and no devices.
    pub fn new() -> Self {
        MemoryBus {
            memory: Box::new([0; ADDRESS_SPACE_SIZE]),
            devices: Vec::new(),
        }
    }

    /// Copies a program image into memory starting at 0x0000.
    ///
    /// The image must fit in the address space; the loader enforces the
    /// size limit before calling this.
    pub fn load_image(&mut self, image: &[u8]) {
        if image.len() > ADDRESS_SPACE_SIZE {
            panic!(
                "image is too large: {} bytes exceeds the {} byte address space",
                image.len(),
                ADDRESS_SPACE_SIZE
            );
        }
        self.memory[..image.len()].copy_from_slice(image);
        log::debug!("loaded {} byte image at 0x0000", image.len());
    }

    /// Attaches a device over an inclusive address range. Reads and writes
    /// inside the range go to the device instead of the backing array.
    /// Ranges are consulted in registration order; the first match wins.
    pub fn register_device(&mut self, start: u16, end: u16, device: Box<dyn MmioDevice>) {
        self.devices.push(MmioRange { start, end, device });
    }

    /// Reads a byte from the specified memory address.
    pub fn read_byte(&mut self, addr: u16) -> u8 {
        if let Some(range) = self.devices.iter_mut().find(|r| r.contains(addr)) {
            return range.device.read(addr);
        }
        self.memory[addr as usize]
    }

    /// Writes a byte to the specified memory address.
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        if let Some(range) = self.devices.iter_mut().find(|r| r.contains(addr)) {
            range.device.write(addr, value);
            return;
        }
        self.memory[addr as usize] = value;
    }

    /// Reads a little-endian word; the high byte comes from `addr + 1`,
    /// wrapping at the top of the address space.
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let low = self.read_byte(addr) as u16;
        let high = self.read_byte(addr.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    /// Writes a little-endian word; the low byte lands at `addr`, the high
    /// byte at `addr + 1`, wrapping at the top of the address space.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let low = (value & 0xFF) as u8;
        let high = (value >> 8) as u8;
        self.write_byte(addr, low);
        self.write_byte(addr.wrapping_add(1), high);
    }
}

impl fmt::Debug for MemoryBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBus")
            .field("memory (size)", &self.memory.len())
            .field("devices", &self.devices.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_little_endian() {
        let mut bus = MemoryBus::new();
        bus.write_word(0xC000, 0x1234);
        assert_eq!(bus.read_byte(0xC000), 0x34);
        assert_eq!(bus.read_byte(0xC001), 0x12);
        assert_eq!(bus.read_word(0xC000), 0x1234);
    }

    #[test]
    fn word_at_top_of_memory_wraps() {
        let mut bus = MemoryBus::new();
        bus.write_word(0xFFFF, 0xABCD);
        assert_eq!(bus.read_byte(0xFFFF), 0xCD);
        assert_eq!(bus.read_byte(0x0000), 0xAB);
        assert_eq!(bus.read_word(0xFFFF), 0xABCD);
    }

    #[test]
    fn image_loads_from_address_zero() {
        let mut bus = MemoryBus::new();
        bus.load_image(&[0x11, 0x22, 0x33]);
        assert_eq!(bus.read_byte(0x0000), 0x11);
        assert_eq!(bus.read_byte(0x0001), 0x22);
        assert_eq!(bus.read_byte(0x0002), 0x33);
        assert_eq!(bus.read_byte(0x0003), 0x00);
    }

    struct Probe {
        value: u8,
        writes: Vec<(u16, u8)>,
    }

    impl MmioDevice for Probe {
        fn read(&mut self, _addr: u16) -> u8 {
            self.value
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.writes.push((addr, value));
        }
    }

    #[test]
    fn registered_device_intercepts_its_range() {
        let mut bus = MemoryBus::new();
        bus.write_byte(0xFF40, 0x55);
        bus.register_device(
            0xFF40,
            0xFF4B,
            Box::new(Probe {
                value: 0x99,
                writes: Vec::new(),
            }),
        );

        // Reads in range come from the device, not the backing array.
        assert_eq!(bus.read_byte(0xFF40), 0x99);
        assert_eq!(bus.read_byte(0xFF4B), 0x99);

        // Writes in range never reach the backing array.
        bus.write_byte(0xFF41, 0x77);
        assert_eq!(bus.read_byte(0xFF41), 0x99);

        // Addresses outside the range are untouched.
        bus.write_byte(0xFF4C, 0x42);
        assert_eq!(bus.read_byte(0xFF4C), 0x42);
    }
}

//! Program image loading and the cartridge header view.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::memory_map::ADDRESS_SPACE_SIZE;

// Header field offsets within the image.
pub const ENTRY_POINT_START: usize = 0x0100;
pub const ENTRY_POINT_END: usize = 0x0103;
pub const LOGO_START: usize = 0x0104;
pub const LOGO_END: usize = 0x0133;
pub const TITLE_START: usize = 0x0134;
pub const TITLE_END: usize = 0x0143;
pub const CARTRIDGE_TYPE_ADDR: usize = 0x0147;
pub const ROM_SIZE_ADDR: usize = 0x0148;
pub const RAM_SIZE_ADDR: usize = 0x0149;
pub const HEADER_CHECKSUM_ADDR: usize = 0x014D;

/// Errors surfaced while loading a program image from disk.
#[derive(Debug)]
pub enum CartridgeError {
    Io(io::Error),
    TooLarge { size: usize },
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::Io(e) => write!(f, "failed to read image: {}", e),
            CartridgeError::TooLarge { size } => write!(
                f,
                "image is {} bytes, larger than the {} byte address space",
                size, ADDRESS_SPACE_SIZE
            ),
        }
    }
}

impl std::error::Error for CartridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartridgeError::Io(e) => Some(e),
            CartridgeError::TooLarge { .. } => None,
        }
    }
}

impl From<io::Error> for CartridgeError {
    fn from(e: io::Error) -> Self {
        CartridgeError::Io(e)
    }
}

/// Reads a program image, rejecting anything the address space cannot hold.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, CartridgeError> {
    let image = fs::read(path)?;
    if image.len() > ADDRESS_SPACE_SIZE {
        return Err(CartridgeError::TooLarge { size: image.len() });
    }
    Ok(image)
}

/// Parsed view of the cartridge header block.
///
/// Raw test images are often too short to carry a header at all, so parsing
/// is optional rather than an error.
#[derive(Debug, Clone)]
pub struct Header {
    pub title: String,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub checksum: u8,
    pub checksum_valid: bool,
}

impl Header {
    /// Returns `None` when the image ends before the checksum byte.
    pub fn parse(image: &[u8]) -> Option<Header> {
        if image.len() <= HEADER_CHECKSUM_ADDR {
            return None;
        }

        let title: String = image[TITLE_START..=TITLE_END]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        let checksum = image[HEADER_CHECKSUM_ADDR];
        let computed = header_checksum(image);
        let checksum_valid = computed == checksum;
        if !checksum_valid {
            log::warn!(
                "header checksum mismatch: stored {:#04X}, computed {:#04X}",
                checksum,
                computed
            );
        }

        Some(Header {
            title,
            cartridge_type: image[CARTRIDGE_TYPE_ADDR],
            rom_size_code: image[ROM_SIZE_ADDR],
            ram_size_code: image[RAM_SIZE_ADDR],
            checksum,
            checksum_valid,
        })
    }
}

// x starts at zero and wraps through x - b - 1 over 0x0134..=0x014C.
fn header_checksum(image: &[u8]) -> u8 {
    let mut x: u8 = 0;
    for &b in &image[TITLE_START..HEADER_CHECKSUM_ADDR] {
        x = x.wrapping_sub(b).wrapping_sub(1);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0x0150 zeroed bytes with title "ABC". The 25-byte checksum region
    // holds the title, the type/size codes (0x01, 0x02, 0x03) and 19 zeros,
    // which works out to 0x1B.
    fn image_with_header() -> Vec<u8> {
        let mut image = vec![0u8; 0x0150];
        image[TITLE_START] = b'A';
        image[TITLE_START + 1] = b'B';
        image[TITLE_START + 2] = b'C';
        image[CARTRIDGE_TYPE_ADDR] = 0x01;
        image[ROM_SIZE_ADDR] = 0x02;
        image[RAM_SIZE_ADDR] = 0x03;
        image[HEADER_CHECKSUM_ADDR] = 0x1B;
        image
    }

    #[test]
    fn short_image_has_no_header() {
        assert!(Header::parse(&[0u8; 0x0100]).is_none());
        assert!(Header::parse(&[]).is_none());
    }

    #[test]
    fn header_fields_come_from_their_fixed_offsets() {
        let header = Header::parse(&image_with_header()).unwrap();
        assert_eq!(header.title, "ABC");
        assert_eq!(header.cartridge_type, 0x01);
        assert_eq!(header.rom_size_code, 0x02);
        assert_eq!(header.ram_size_code, 0x03);
        assert_eq!(header.checksum, 0x1B);
        assert!(header.checksum_valid);
    }

    #[test]
    fn corrupted_checksum_is_reported_not_rejected() {
        let mut image = image_with_header();
        image[HEADER_CHECKSUM_ADDR] = 0x00;
        let header = Header::parse(&image).unwrap();
        assert!(!header.checksum_valid);
        assert_eq!(header.title, "ABC");
    }

    #[test]
    fn title_stops_at_the_first_nul() {
        let mut image = image_with_header();
        image[TITLE_START + 1] = 0;
        let header = Header::parse(&image).unwrap();
        assert_eq!(header.title, "A");
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let result = read_image("/definitely/not/a/real/image.gb");
        assert!(matches!(result, Err(CartridgeError::Io(_))));
    }

    #[test]
    fn oversized_image_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "matcha_oversized_image_{}.gb",
            std::process::id()
        ));
        fs::write(&path, vec![0u8; ADDRESS_SPACE_SIZE + 1]).unwrap();
        let result = read_image(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(CartridgeError::TooLarge { size }) if size == ADDRESS_SPACE_SIZE + 1
        ));
    }

    #[test]
    fn exact_fit_image_loads() {
        let path = std::env::temp_dir().join(format!(
            "matcha_exact_fit_image_{}.gb",
            std::process::id()
        ));
        fs::write(&path, vec![0u8; ADDRESS_SPACE_SIZE]).unwrap();
        let result = read_image(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(result.unwrap().len(), ADDRESS_SPACE_SIZE);
    }
}

//! Minimal 1-bit BMP container.
//!
//! The headers are explicit named-field structs serialized little-endian
//! field by field. The byte layout is a format contract: signature `BM`,
//! 40-byte DIB header, two-entry palette, pixel data at offset 62.

use std::io::Write;

/// Offset of the pixel data from the start of the file:
/// 14-byte file header + 40-byte DIB header + 2 palette entries of 4 bytes.
pub const PIXEL_DATA_OFFSET: u32 = 14 + 40 + 2 * 4;

/// Two-entry palette: index 0 = black (empty), index 1 = white (solid).
/// Entries are stored as little-endian `0x00000000` and `0x00FFFFFF`.
pub const PALETTE: [u8; 8] = [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x00];

/// BMP file header (14 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpFileHeader {
    /// Total file size in bytes.
    pub file_size: u32,
}

impl BmpFileHeader {
    /// Serialize to the 14-byte on-disk layout.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 14] {
        let mut bytes = [0u8; 14];
        bytes[0..2].copy_from_slice(&0x4D42u16.to_le_bytes()); // "BM"
        bytes[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        bytes[6..8].copy_from_slice(&0u16.to_le_bytes()); // reserved
        bytes[8..10].copy_from_slice(&0u16.to_le_bytes()); // reserved
        bytes[10..14].copy_from_slice(&PIXEL_DATA_OFFSET.to_le_bytes());
        bytes
    }
}

/// BMP DIB header (BITMAPINFOHEADER, 40 bytes), fixed to 1 bit per pixel
/// with two palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpInfoHeader {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels (rows are stored bottom-to-top).
    pub height: u32,
    /// Pixel data size in bytes (rows × packed row length).
    pub image_size: u32,
    /// Horizontal resolution in pixels per meter.
    pub ppm_x: i32,
    /// Vertical resolution in pixels per meter.
    pub ppm_y: i32,
}

impl BmpInfoHeader {
    /// Serialize to the 40-byte on-disk layout.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    // Wrap: grid dimensions never approach i32::MAX
    pub fn to_bytes(self) -> [u8; 40] {
        let mut bytes = [0u8; 40];
        bytes[0..4].copy_from_slice(&40u32.to_le_bytes()); // header size
        bytes[4..8].copy_from_slice(&(self.width as i32).to_le_bytes());
        bytes[8..12].copy_from_slice(&(self.height as i32).to_le_bytes());
        bytes[12..14].copy_from_slice(&1u16.to_le_bytes()); // planes
        bytes[14..16].copy_from_slice(&1u16.to_le_bytes()); // bits per pixel
        bytes[16..20].copy_from_slice(&0u32.to_le_bytes()); // no compression
        bytes[20..24].copy_from_slice(&self.image_size.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.ppm_x.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.ppm_y.to_le_bytes());
        bytes[32..36].copy_from_slice(&2u32.to_le_bytes()); // colors used
        bytes[36..40].copy_from_slice(&0u32.to_le_bytes()); // important colors
        bytes
    }
}

/// Pixels-per-meter resolution for a pitch in millimeters.
///
/// # Example
///
/// ```
/// use vox_io::pixels_per_meter;
///
/// assert_eq!(pixels_per_meter(1.0), 1000);
/// assert_eq!(pixels_per_meter(25.4 / 360.0), 14173);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: any sane pitch rounds to well within i32
pub fn pixels_per_meter(pitch_mm: f64) -> i32 {
    (1000.0 / pitch_mm).round() as i32
}

/// Write a complete 1-bit BMP.
///
/// `rows` holds one packed, word-aligned scanline per image row, bottom row
/// first — which is exactly the order BMP stores them, so they are written
/// as-is.
///
/// # Errors
///
/// Any error from the underlying writer.
#[allow(clippy::cast_possible_truncation)]
// Truncation: image sizes are bounded by grid dimensions (u32)
pub fn write_bmp<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    ppm: i32,
    rows: &[Vec<u8>],
) -> std::io::Result<()> {
    let image_size: usize = rows.iter().map(Vec::len).sum();
    let image_size = image_size as u32;

    let file_header = BmpFileHeader {
        file_size: PIXEL_DATA_OFFSET + image_size,
    };
    let info_header = BmpInfoHeader {
        width,
        height,
        image_size,
        ppm_x: ppm,
        ppm_y: ppm,
    };

    writer.write_all(&file_header.to_bytes())?;
    writer.write_all(&info_header.to_bytes())?;
    writer.write_all(&PALETTE)?;
    for row in rows {
        writer.write_all(row)?;
    }

    Ok(())
}

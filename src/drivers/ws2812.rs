//! WS2812 bit encoder for SPI-driven strips.
//!
//! At an SPI clock of 2.4 MHz one SPI bit lasts ~417 ns, so each WS2812
//! data bit is sent as three SPI bits: `110` for a one, `100` for a zero.
//! Pixels go out GRB, most significant bit first, followed by a run of
//! zero bytes that holds the line low for the latch.

/// SPI clock for the 3-bit encoding.
pub const SPI_CLOCK_HZ: u32 = 2_400_000;

/// SPI bytes per pixel (24 data bits × 3).
pub const BYTES_PER_PIXEL: usize = 9;

/// Zero bytes appended as the reset/latch period (> 80 µs at 2.4 MHz).
pub const RESET_BYTES: usize = 30;

/// Total SPI frame length for `pixels` pixels.
pub const fn frame_len(pixels: usize) -> usize {
    pixels * BYTES_PER_PIXEL + RESET_BYTES
}

/// Encode packed `0xRRGGBB` pixels into `out`, replacing its contents.
pub fn encode_into(pixels: &[u32], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(frame_len(pixels.len()));
    for &rgb in pixels {
        let [_, r, g, b] = rgb.to_be_bytes();
        for byte in [g, r, b] {
            out.extend_from_slice(&encode_byte(byte));
        }
    }
    out.resize(out.len() + RESET_BYTES, 0);
}

/// Expand one color byte into 24 SPI bits.
fn encode_byte(byte: u8) -> [u8; 3] {
    let mut bits: u32 = 0;
    for i in (0..8).rev() {
        let pattern = if byte & (1 << i) != 0 { 0b110 } else { 0b100 };
        bits = (bits << 3) | pattern;
    }
    let [_, hi, mid, lo] = bits.to_be_bytes();
    [hi, mid, lo]
}

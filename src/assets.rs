use image::RgbaImage;
use thiserror::Error;

/// Cheetah run cycle, 512x252, a 4x2 grid of 128x126 frames.
pub const SHEET_PNG: &[u8] = include_bytes!("../assets/cheetah.png");
/// Forest backdrop at native screen size.
pub const BACKDROP_PNG: &[u8] = include_bytes!("../assets/forest.png");
/// Looped PCM sample for the audio demo.
pub const LOOP_WAV: &[u8] = include_bytes!("../assets/loop.wav");

/// Frame cell size within the cheetah sheet.
pub const FRAME_W: u32 = 512 / 4;
pub const FRAME_H: u32 = 252 / 2;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode an embedded PNG into an RGBA8 pixel buffer.
///
/// Failure is terminal for the process: the demos never proceed with a
/// missing pixel buffer.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_decodes_to_a_4x2_grid() {
        let sheet = decode_png(SHEET_PNG).unwrap();
        assert_eq!(sheet.width(), FRAME_W * 4);
        assert_eq!(sheet.height(), FRAME_H * 2);
    }

    #[test]
    fn backdrop_decodes_at_native_resolution() {
        let backdrop = decode_png(BACKDROP_PNG).unwrap();
        assert_eq!((backdrop.width(), backdrop.height()), (480, 272));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_png(b"not a png").is_err());
    }
}

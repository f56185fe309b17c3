use crate::particles::ParticleRecord;

use super::resolver::ResolveError;

/// Decoded RGBA8 image, row-major, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps `data`, which must hold exactly `width * height` RGBA8 pixels.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ResolveError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ResolveError::Decode(format!(
                "{width}x{height} image needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn alpha(&self, x: u32, row: u32) -> u8 {
        self.data[alpha_index(self.width, x, row)]
    }
}

/// Byte offset of the alpha channel of pixel `(x, row)`.
///
/// Computed in `usize` like the length check in [`PixelBuffer::new`], so
/// images past `u32` byte sizes index correctly.
fn alpha_index(width: u32, x: u32, row: u32) -> usize {
    (row as usize * width as usize + x as usize) * 4 + 3
}

/// One resting particle per pixel with non-zero alpha.
///
/// Coordinates are centered on the image midpoint with +Y up, so the bottom
/// image row has the lowest `y`. Output order is stable for a given buffer.
pub fn extract_particles(pixels: &PixelBuffer) -> Vec<ParticleRecord> {
    let (w, h) = (pixels.width, pixels.height);
    let start_x = -(w as f32) / 2.0;
    let start_y = -(h as f32) / 2.0;

    let mut out = Vec::new();
    for j in 0..h {
        let row = h - j - 1;
        for i in 0..w {
            let a = pixels.alpha(i, row);
            if a == 0 {
                continue;
            }
            let origin = [start_x + i as f32, start_y + j as f32];
            out.push(ParticleRecord::at_rest(origin, a as f32 / 255.0));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 image; `alphas` is row-major from the top-left.
    fn image(alphas: [u8; 6]) -> PixelBuffer {
        let data = alphas.iter().flat_map(|&a| [0, 0, 0, a]).collect();
        PixelBuffer::new(3, 2, data).unwrap()
    }

    #[test]
    fn alpha_index_does_not_wrap_on_large_images() {
        assert_eq!(alpha_index(3, 1, 1), 19);

        // 40000 * 40000 * 4 bytes is past u32::MAX.
        let index = alpha_index(40_000, 7, 39_999);
        assert_eq!(index as u64, (39_999u64 * 40_000 + 7) * 4 + 3);
        assert!(index as u64 > u32::MAX as u64);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(PixelBuffer::new(2, 2, vec![0; 15]), Err(ResolveError::Decode(_))));
    }

    #[test]
    fn count_is_number_of_visible_pixels() {
        let particles = extract_particles(&image([0, 10, 255, 0, 0, 1]));
        assert_eq!(particles.len(), 3);
        assert!(particles.iter().all(|p| p.velocity == [0.0, 0.0] && p.position == p.origin));
    }

    #[test]
    fn rows_are_flipped_and_centered() {
        // Only the top-left and bottom-right pixels are visible.
        let particles = extract_particles(&image([255, 0, 0, 0, 0, 51]));
        assert_eq!(particles.len(), 2);

        // Bottom row comes first and sits lowest.
        assert_eq!(particles[0].origin, [0.5, -1.0]);
        assert!((particles[0].alpha - 0.2).abs() < 1e-6);

        assert_eq!(particles[1].origin, [-1.5, 0.0]);
        assert_eq!(particles[1].alpha, 1.0);
    }

    #[test]
    fn reingesting_is_idempotent() {
        let img = image([1, 2, 3, 0, 5, 6]);
        assert_eq!(extract_particles(&img), extract_particles(&img));
    }

    #[test]
    fn fully_transparent_image_yields_nothing() {
        assert!(extract_particles(&image([0; 6])).is_empty());
    }
}

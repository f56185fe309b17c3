/// Edge length of the generated radial mask, in texels.
pub const RADIAL_MASK_SIZE: u32 = 64;

/// RGBA8 pixels of a soft disc: white everywhere, alpha falling smoothly from 1
/// at the center to 0 at the inscribed circle's edge.
pub fn radial_mask_pixels(size: u32) -> Vec<u8> {
    let size = size.max(1);
    let half = size as f32 * 0.5;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let r = dx.hypot(dy).min(1.0);

            // smoothstep(1, 0, r)
            let t = 1.0 - r;
            let alpha = t * t * (3.0 - 2.0 * t);

            pixels.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
        }
    }

    pixels
}

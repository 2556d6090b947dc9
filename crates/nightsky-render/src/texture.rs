//! Soft circular sprite texture for glowing particles, with PNG export.

use std::io::Write;
use std::path::Path;

/// Errors that can occur when exporting a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Failed to create or write the output file.
    #[error("failed to write texture: {0}")]
    Io(#[from] std::io::Error),

    /// The PNG encoder rejected the image.
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
}

/// A color stop of the radial gradient: normalized radius, RGB bytes, alpha.
type GradientStop = (f32, [f32; 3], f32);

/// Opaque white core fading through pale blue to a transparent rim.
const SPRITE_STOPS: [GradientStop; 4] = [
    (0.0, [255.0, 255.0, 255.0], 1.0),
    (0.2, [255.0, 255.0, 255.0], 0.8),
    (0.4, [200.0, 200.0, 255.0], 0.4),
    (1.0, [150.0, 150.0, 255.0], 0.0),
];

/// A square RGBA8 texture.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteTexture {
    /// Width and height in pixels.
    pub size: u32,
    /// Row-major RGBA8 pixels, `size * size * 4` bytes.
    pub pixels: Vec<u8>,
}

impl SpriteTexture {
    /// Render the radial alpha falloff used for nebula particles.
    ///
    /// The gradient is centered on the texture and reaches its outer stop at
    /// half the texture size; the corners beyond it take the last stop.
    pub fn radial_glow(size: u32) -> Self {
        let size = size.max(1);
        let half = size as f32 / 2.0;
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - half;
                let dy = y as f32 + 0.5 - half;
                let t = ((dx * dx + dy * dy).sqrt() / half).min(1.0);
                let (rgb, alpha) = sample_gradient(&SPRITE_STOPS, t);
                pixels.push(rgb[0].round() as u8);
                pixels.push(rgb[1].round() as u8);
                pixels.push(rgb[2].round() as u8);
                pixels.push((alpha * 255.0).round() as u8);
            }
        }

        Self { size, pixels }
    }

    /// RGBA value at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.size as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Encode the texture as PNG into `writer`.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), TextureError> {
        let mut encoder = png::Encoder::new(writer, self.size, self.size);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }

    /// Write the texture to a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), TextureError> {
        let file = std::fs::File::create(path)?;
        self.write_png(std::io::BufWriter::new(file))?;
        log::info!("Wrote {}x{} sprite to {}", self.size, self.size, path.display());
        Ok(())
    }
}

/// Linearly interpolate between the two stops bracketing `t`.
fn sample_gradient(stops: &[GradientStop], t: f32) -> ([f32; 3], f32) {
    let mut lower = stops[0];
    for &upper in stops {
        if t <= upper.0 {
            let span = upper.0 - lower.0;
            let f = if span > 0.0 { (t - lower.0) / span } else { 0.0 };
            let rgb = [
                lower.1[0] + (upper.1[0] - lower.1[0]) * f,
                lower.1[1] + (upper.1[1] - lower.1[1]) * f,
                lower.1[2] + (upper.1[2] - lower.1[2]) * f,
            ];
            return (rgb, lower.2 + (upper.2 - lower.2) * f);
        }
        lower = upper;
    }
    (lower.1, lower.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_dimensions() {
        let texture = SpriteTexture::radial_glow(128);
        assert_eq!(texture.size, 128);
        assert_eq!(texture.pixels.len(), 128 * 128 * 4);
    }

    #[test]
    fn test_center_is_opaque_white() {
        let texture = SpriteTexture::radial_glow(128);
        let [r, g, b, a] = texture.pixel(64, 64);
        assert!(r > 250 && g > 250 && b > 250, "center should be white");
        assert!(a > 245, "center alpha {a} should be nearly opaque");
    }

    #[test]
    fn test_corners_are_transparent() {
        let texture = SpriteTexture::radial_glow(128);
        for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127)] {
            assert_eq!(texture.pixel(x, y)[3], 0, "corner ({x}, {y}) should be clear");
        }
    }

    #[test]
    fn test_largest_texture_indexes_last_pixel() {
        let texture = SpriteTexture::radial_glow(4096);
        assert_eq!(texture.pixels.len(), 4096 * 4096 * 4);
        assert_eq!(texture.pixel(4095, 4095)[3], 0);
        assert!(texture.pixel(2048, 2048)[3] > 245);
    }

    #[test]
    fn test_alpha_falls_off_with_distance() {
        let texture = SpriteTexture::radial_glow(128);
        let mut previous = 255u8;
        for x in 64..128 {
            let alpha = texture.pixel(x, 64)[3];
            assert!(alpha <= previous, "alpha rose at x={x}: {alpha} > {previous}");
            previous = alpha;
        }
    }

    #[test]
    fn test_rim_is_tinted_blue() {
        let texture = SpriteTexture::radial_glow(128);
        let [r, _, b, _] = texture.pixel(120, 64);
        assert!(b > r, "rim should lean blue (r={r}, b={b})");
    }

    #[test]
    fn test_gradient_hits_stops_exactly() {
        let (rgb, alpha) = sample_gradient(&SPRITE_STOPS, 0.4);
        assert_eq!(rgb, [200.0, 200.0, 255.0]);
        assert!((alpha - 0.4).abs() < 1e-6);
        let (_, alpha) = sample_gradient(&SPRITE_STOPS, 1.0);
        assert_eq!(alpha, 0.0);
    }

    #[test]
    fn test_png_export_has_signature() {
        let texture = SpriteTexture::radial_glow(16);
        let mut bytes = Vec::new();
        texture.write_png(&mut bytes).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        SpriteTexture::radial_glow(32).save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

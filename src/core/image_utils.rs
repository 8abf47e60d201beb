use image::{Rgb, RgbImage};
use std::path::PathBuf;

#[derive(Clone, Debug)]
/**
 * Used to map from sample index into the "regular" domain used to generate the fractals.
 * Behaves like `linspace`: both end points are hit exactly.
 */
pub struct LinearPixelMap {
    offset: f64,
    slope: f64,
    last_index: u32,
    last_value: f64,
}

impl LinearPixelMap {
    /**
     * @param n: number of pixels spanned by [x0,x1]
     * @param x0: output of the map at 0
     * @param x1: output of the map at n-1
     */
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert!(n > 0);
        let slope = if n > 1 {
            (x1 - x0) / ((n - 1) as f64)
        } else {
            0.0
        };
        LinearPixelMap {
            offset: x0,
            slope,
            last_index: n - 1,
            last_value: if n > 1 { x1 } else { x0 },
        }
    }

    // Map from pixel (integer) to point (float)
    pub fn map(&self, index: u32) -> f64 {
        if index == self.last_index {
            self.last_value
        } else {
            self.offset + self.slope * (index as f64)
        }
    }
}

/// Converts a color on [0,1] to 8-bit RGB, rounding to the nearest level.
pub fn quantize_color(rgb: &[f32; 3]) -> Rgb<u8> {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb([channel(rgb[0]), channel(rgb[1]), channel(rgb[2])])
}

/**
 * Builds an image from a row-major color buffer whose first row is the
 * *bottom* of the picture (lowest imaginary part). Images are stored
 * top-down, so the rows are flipped here.
 */
pub fn color_buffer_to_image(width: usize, height: usize, pixels: &[[f32; 3]]) -> RgbImage {
    assert_eq!(pixels.len(), width * height, "color buffer size mismatch");
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let row = height - 1 - y as usize;
        quantize_color(&pixels[row * width + x as usize])
    })
}

pub fn write_image_to_file<F, T, E>(filename: PathBuf, save_lambda: F) -> Result<T, E>
where
    F: FnOnce(&PathBuf) -> Result<T, E>,
{
    let result = save_lambda(&filename)?;
    log::info!("Wrote image file to: {}", filename.display());
    Ok(result)
}

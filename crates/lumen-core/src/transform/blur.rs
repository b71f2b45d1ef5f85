//! Floating-point RGBA matrix with a Gaussian blur.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// One pixel with channels in the 0.0..=255.0 range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbaPixel {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Row-major pixel matrix used by the blur pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaMatrix {
    data: Vec<RgbaPixel>,
    width: usize,
    height: usize,
}

impl RgbaMatrix {
    /// Convert an image into a matrix of straight (non-premultiplied) RGBA.
    pub fn from_image(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image
            .to_rgba8()
            .pixels()
            .map(|p| RgbaPixel {
                r: p[0] as f64,
                g: p[1] as f64,
                b: p[2] as f64,
                a: p[3] as f64,
            })
            .collect();
        Self {
            data,
            width: width as usize,
            height: height as usize,
        }
    }

    /// Convert back to an image; channels are clamped to 0..=255 and truncated.
    pub fn to_image(&self) -> DynamicImage {
        let buffer = RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let p = self.data[y as usize * self.width + x as usize];
            Rgba([clamp8(p.r), clamp8(p.g), clamp8(p.b), clamp8(p.a)])
        });
        DynamicImage::ImageRgba8(buffer)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at `(x, y)`, or `None` outside the matrix.
    pub fn at(&self, x: usize, y: usize) -> Option<RgbaPixel> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Blur in place with a normalised `kernel_size`² Gaussian.
    ///
    /// An even or too-small kernel falls back to 3. Pixels closer than
    /// `kernel_size / 2` to an edge are left as they were.
    pub fn gaussian_blur(&mut self, kernel_size: usize, sigma: f64) {
        let kernel_size = if kernel_size < 3 || kernel_size % 2 == 0 {
            3
        } else {
            kernel_size
        };
        let kernel = gaussian_kernel(kernel_size, sigma);
        let norm: f64 = kernel.iter().sum();
        let half = kernel_size / 2;
        let source = self.data.clone();

        for y in half..self.height.saturating_sub(half) {
            for x in half..self.width.saturating_sub(half) {
                let mut acc = RgbaPixel::default();
                for ky in 0..kernel_size {
                    for kx in 0..kernel_size {
                        let px = source[(y + ky - half) * self.width + (x + kx - half)];
                        let w = kernel[ky * kernel_size + kx];
                        acc.r += px.r * w;
                        acc.g += px.g * w;
                        acc.b += px.b * w;
                        acc.a += px.a * w;
                    }
                }
                self.data[y * self.width + x] = RgbaPixel {
                    r: acc.r / norm,
                    g: acc.g / norm,
                    b: acc.b / norm,
                    a: acc.a / norm,
                };
            }
        }
    }
}

/// Unnormalised row-major Gaussian kernel.
fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    let half = (size / 2) as i64;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel = Vec::with_capacity(size * size);
    for y in -half..=half {
        for x in -half..=half {
            kernel.push((-((x * x + y * y) as f64) / two_sigma_sq).exp());
        }
    }
    kernel
}

fn clamp8(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

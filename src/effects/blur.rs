use std::collections::HashMap;
use std::sync::Arc;

use crate::effects::working::WorkingImage;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Largest kernel half-width any blur may request.
pub(crate) const MAX_BLUR_RADIUS_PX: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BlurKernelKey {
    radius_px: u32,
    sigma_bits: u32,
}

/// Kernels and the intermediate row buffer shared by every blur in a render context.
#[derive(Debug, Default)]
pub(crate) struct BlurScratch {
    kernels: HashMap<BlurKernelKey, Arc<Vec<f32>>>,
    tmp: Vec<[f32; 4]>,
}

impl BlurScratch {
    pub(crate) fn kernel(&mut self, sigma: f32) -> PhotoboothResult<Arc<Vec<f32>>> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(PhotoboothError::validation(
                "blur sigma must be finite and >= 0",
            ));
        }
        let radius_px = (sigma * 3.0).ceil() as u32;
        if radius_px > MAX_BLUR_RADIUS_PX {
            return Err(PhotoboothError::validation(format!(
                "blur radius {radius_px}px exceeds limit {MAX_BLUR_RADIUS_PX}px"
            )));
        }
        let key = BlurKernelKey {
            radius_px,
            sigma_bits: sigma.to_bits(),
        };
        if let Some(k) = self.kernels.get(&key) {
            return Ok(k.clone());
        }
        let k = Arc::new(gaussian_kernel(radius_px, sigma)?);
        self.kernels.insert(key, k.clone());
        Ok(k)
    }

    /// Separable gaussian blur of all four channels, clamp-to-edge.
    pub(crate) fn gaussian(
        &mut self,
        src: &WorkingImage,
        sigma: f32,
    ) -> PhotoboothResult<WorkingImage> {
        let kernel = self.kernel(sigma)?;
        let mut out = src.blank_like();
        self.tmp.clear();
        self.tmp.resize(src.px.len(), [0.0; 4]);
        blur_separable(src, &mut out, &mut self.tmp, &kernel);
        Ok(out)
    }

    #[cfg(test)]
    pub(crate) fn cached_kernels(&self) -> usize {
        self.kernels.len()
    }
}

/// Normalized weights for `-radius..=radius`.
pub(crate) fn gaussian_kernel(radius: u32, sigma: f32) -> PhotoboothResult<Vec<f32>> {
    if radius == 0 {
        return Ok(vec![1.0]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PhotoboothError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(PhotoboothError::render("gaussian kernel sum is zero"));
    }
    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

fn blur_separable(src: &WorkingImage, dst: &mut WorkingImage, tmp: &mut [[f32; 4]], k: &[f32]) {
    if k.len() == 1 {
        dst.px.copy_from_slice(&src.px);
        return;
    }
    horizontal_blur(&src.px, tmp, src.width, src.height, k);
    vertical_blur(tmp, &mut dst.px, src.width, src.height, k);
}

fn horizontal_blur(src: &[[f32; 4]], dst: &mut [[f32; 4]], width: u32, height: u32, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    for y in 0..i64::from(height) {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i64 - radius).clamp(0, w - 1);
                let p = src[(y * w + sx) as usize];
                for c in 0..4 {
                    acc[c] += kw * p[c];
                }
            }
            dst[(y * w + x) as usize] = acc;
        }
    }
}

fn vertical_blur(src: &[[f32; 4]], dst: &mut [[f32; 4]], width: u32, height: u32, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i64 - radius).clamp(0, h - 1);
                let p = src[(sy * w + x) as usize];
                for c in 0..4 {
                    acc[c] += kw * p[c];
                }
            }
            dst[(y * w + x) as usize] = acc;
        }
    }
}

/// Canvas `shadowBlur` as a gaussian: sigma is half the blur value, taps reach 3 sigma.
pub fn shadow_kernel(blur: f64) -> Vec<f32> {
    if !blur.is_finite() || blur <= 0.0 {
        return vec![1.0];
    }
    let sigma = blur / 2.0;
    let radius = (sigma * 3.0).ceil() as i64;
    let denom = 2.0 * sigma * sigma;
    let taps: Vec<f64> = (-radius..=radius)
        .map(|i| (-(i * i) as f64 / denom).exp())
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Blur a one-byte-per-pixel coverage mask for a canvas shadow.
///
/// Pixels beyond the edges count as uncovered, so a shadow fades out at the surface border.
pub fn blur_alpha(mask: &[u8], width: usize, height: usize, blur: f64) -> Vec<u8> {
    let kernel = shadow_kernel(blur);
    if kernel.len() == 1 || mask.len() != width * height {
        return mask.to_vec();
    }
    let radius = (kernel.len() / 2) as isize;

    let mut rows = vec![0f32; mask.len()];
    for y in 0..height {
        let row = &mask[y * width..(y + 1) * width];
        for x in 0..width {
            rows[y * width + x] = kernel
                .iter()
                .enumerate()
                .filter_map(|(k, &w)| {
                    let sx = x as isize + k as isize - radius;
                    row.get(usize::try_from(sx).ok()?).map(|&a| w * f32::from(a))
                })
                .sum();
        }
    }

    let mut out = vec![0u8; mask.len()];
    for y in 0..height {
        for x in 0..width {
            let v: f32 = kernel
                .iter()
                .enumerate()
                .filter_map(|(k, &w)| {
                    let sy = usize::try_from(y as isize + k as isize - radius).ok()?;
                    (sy < height).then(|| w * rows[sy * width + x])
                })
                .sum();
            out[y * width + x] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/blur.rs"]
mod tests;

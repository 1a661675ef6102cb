//! Decaying 2-D occupancy accumulator with colorized rendering.

use image::{Rgb, RgbImage, imageops};
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

/// Heatmap tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Per-frame multiplicative fade, must be in (0, 1)
    #[serde(default = "default_decay")]
    pub decay: f32,
    /// Peak value added per deposit at the kernel center
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Kernel radius in pixels; the kernel spans `2 * radius + 1` cells
    #[serde(default = "default_radius")]
    pub radius: usize,
}

fn default_decay() -> f32 {
    0.985
}

fn default_intensity() -> f32 {
    50.0
}

fn default_radius() -> usize {
    80
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            decay: default_decay(),
            intensity: default_intensity(),
            radius: default_radius(),
        }
    }
}

/// Decaying occupancy grid sized to the frame resolution.
///
/// Cell values are always >= 0 and unbounded above; normalization happens only
/// at render time. With `decay < 1` the grid converges to zero in the absence
/// of deposits.
pub struct Heatmap {
    grid: Array2<f32>,
    kernel: Array2<f32>,
    config: HeatmapConfig,
}

impl Heatmap {
    pub fn new(width: u32, height: u32, config: HeatmapConfig) -> Self {
        Self {
            grid: Array2::zeros((height as usize, width as usize)),
            kernel: gaussian_kernel(config.radius),
            config,
        }
    }

    /// Fade the whole grid by the configured decay factor.
    ///
    /// Called once per processed frame, independent of activity.
    pub fn decay(&mut self) {
        let decay = self.config.decay;
        self.grid.mapv_inplace(|v| v * decay);
    }

    /// Add one spatial kernel per point, scaled by the configured intensity.
    ///
    /// Kernels that extend past the frame edge are truncated to the grid,
    /// never wrapped or skipped.
    pub fn deposit(&mut self, points: &[(f32, f32)]) {
        let (rows, cols) = self.grid.dim();
        let radius = self.config.radius as i64;
        let intensity = self.config.intensity;

        for &(x, y) in points {
            let cx = x.round() as i64;
            let cy = y.round() as i64;

            // Clip the kernel window to the grid.
            let x_start = (cx - radius).max(0);
            let y_start = (cy - radius).max(0);
            let x_end = (cx + radius + 1).min(cols as i64);
            let y_end = (cy + radius + 1).min(rows as i64);
            if x_start >= x_end || y_start >= y_end {
                continue;
            }

            let kx = (x_start - (cx - radius)) as usize;
            let ky = (y_start - (cy - radius)) as usize;
            let kw = (x_end - x_start) as usize;
            let kh = (y_end - y_start) as usize;

            let kernel = self.kernel.slice(s![ky..ky + kh, kx..kx + kw]);
            let mut window = self.grid.slice_mut(s![
                y_start as usize..y_end as usize,
                x_start as usize..x_end as usize
            ]);
            window.zip_mut_with(&kernel, |cell, &k| *cell += k * intensity);
        }
    }

    /// Render the grid as a jet-colorized thumbnail of the given size.
    ///
    /// Normalizes to the current min/max range; never mutates the accumulator.
    pub fn render(&self, box_w: u32, box_h: u32) -> RgbImage {
        let (rows, cols) = self.grid.dim();
        let min = self.grid.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.grid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;

        let mut full = RgbImage::new(cols as u32, rows as u32);
        for ((row, col), &v) in self.grid.indexed_iter() {
            let level = if range > 0.0 {
                ((v - min) / range * 255.0) as u8
            } else {
                0
            };
            full.put_pixel(col as u32, row as u32, jet_color(level));
        }

        imageops::resize(&full, box_w, box_h, imageops::FilterType::Triangle)
    }

    /// Raw accumulator value at a cell.
    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.grid[[y, x]]
    }

    /// Grid dimensions as (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        let (rows, cols) = self.grid.dim();
        (cols, rows)
    }
}

/// Discretized Gaussian blob with peak 1.0 at the center, sigma tied to the
/// radius so the blob visibly fills its window.
fn gaussian_kernel(radius: usize) -> Array2<f32> {
    let size = 2 * radius + 1;
    let sigma = (radius as f32 / 2.2).max(f32::EPSILON);
    let denom = 2.0 * sigma * sigma;
    let center = radius as f32;

    Array2::from_shape_fn((size, size), |(row, col)| {
        let dy = row as f32 - center;
        let dx = col as f32 - center;
        (-(dx * dx + dy * dy) / denom).exp()
    })
}

/// Jet palette: dark blue at 0 through green to red at 255.
fn jet_color(level: u8) -> Rgb<u8> {
    let t = level as f32 / 255.0;
    let r = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);
    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(decay: f32, intensity: f32, radius: usize) -> HeatmapConfig {
        HeatmapConfig {
            decay,
            intensity,
            radius,
        }
    }

    #[test]
    fn test_deposit_peaks_at_center() {
        let mut heatmap = Heatmap::new(100, 100, config(0.9, 25.0, 5));
        heatmap.deposit(&[(50.0, 40.0)]);

        let peak = heatmap.value(50, 40);
        assert!((peak - 25.0).abs() < 1e-4);
        assert!(heatmap.value(52, 40) < peak);
        assert_eq!(heatmap.value(90, 90), 0.0);
    }

    #[test]
    fn test_decay_law_without_deposits() {
        let mut heatmap = Heatmap::new(64, 64, config(0.9, 10.0, 3));
        heatmap.deposit(&[(32.0, 32.0)]);
        let before = heatmap.value(32, 32);

        for _ in 0..5 {
            heatmap.decay();
        }
        let expected = before * 0.9_f32.powi(5);
        assert!((heatmap.value(32, 32) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_kernel_truncated_at_corner() {
        let mut heatmap = Heatmap::new(20, 20, config(0.9, 10.0, 8));
        heatmap.deposit(&[(0.0, 0.0)]);
        assert!((heatmap.value(0, 0) - 10.0).abs() < 1e-4);

        // Fully out-of-frame center still deposits its overlapping tail.
        heatmap.deposit(&[(-3.0, 10.0)]);
        assert!(heatmap.value(0, 10) > 0.0);

        // Far enough out that no part of the kernel overlaps: no-op.
        heatmap.deposit(&[(-100.0, 10.0)]);
    }

    #[test]
    fn test_deposits_accumulate() {
        let mut heatmap = Heatmap::new(32, 32, config(0.9, 5.0, 2));
        heatmap.deposit(&[(16.0, 16.0)]);
        heatmap.deposit(&[(16.0, 16.0)]);
        assert!((heatmap.value(16, 16) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_render_size_and_non_mutation() {
        let mut heatmap = Heatmap::new(64, 48, config(0.9, 10.0, 4));
        heatmap.deposit(&[(10.0, 10.0), (40.0, 30.0)]);
        let before = heatmap.value(10, 10);

        let rendered = heatmap.render(240, 240);
        assert_eq!(rendered.dimensions(), (240, 240));
        assert_eq!(heatmap.value(10, 10), before);
    }

    #[test]
    fn test_render_empty_grid() {
        let heatmap = Heatmap::new(16, 16, HeatmapConfig::default());
        let rendered = heatmap.render(8, 8);
        assert_eq!(rendered.dimensions(), (8, 8));
    }

    #[test]
    fn test_jet_palette_endpoints() {
        let cold = jet_color(0);
        let hot = jet_color(255);
        assert!(cold[2] > cold[0], "low end should lean blue");
        assert!(hot[0] > hot[2], "high end should lean red");
    }
}

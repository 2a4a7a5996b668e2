use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use super::engine::{BuriedVolume, BuriedVolumeParams, StericMapRenderer};
use super::frame::{Sphere, occluding_spheres, orient};
use super::native::DEFAULT_RADII_SCALE;
use crate::error::{BvolError, Result};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);
// Diverging palette: low (toward -z) blue, mid grey-white, high (toward +z) red.
const LOW: [f64; 3] = [59.0, 76.0, 192.0];
const MID: [f64; 3] = [221.0, 221.0, 221.0];
const HIGH: [f64; 3] = [180.0, 4.0, 38.0];

/// Renders a top-down steric map of the measurement sphere as PNG.
///
/// Each pixel inside the sphere's disc is colored by the highest atom
/// surface above it, clamped to the sphere, from `-radius` (blue) to
/// `+radius` (red).
#[derive(Clone, Debug)]
pub struct NativeRenderer {
    pub size: u32,
    pub radii_scale: f64,
    pub include_hydrogens: bool,
}

impl Default for NativeRenderer {
    fn default() -> Self {
        Self {
            size: 400,
            radii_scale: DEFAULT_RADII_SCALE,
            include_hydrogens: false,
        }
    }
}

impl StericMapRenderer for NativeRenderer {
    fn render(&self, params: &BuriedVolumeParams<'_>, measured: &BuriedVolume) -> Result<Vec<u8>> {
        if self.size == 0 {
            return Err(BvolError::ArtifactPersistFailed(
                "steric map size must be non-zero".into(),
            ));
        }
        let radius = measured.radius;
        let oriented = orient(params)?;
        let spheres = occluding_spheres(
            params,
            &oriented,
            radius,
            self.radii_scale,
            self.include_hydrogens,
        );

        let size = self.size as f64;
        let px_len = 2.0 * radius / size;
        let img = RgbImage::from_fn(self.size, self.size, |px, py| {
            let x = (px as f64 + 0.5) * px_len - radius;
            let y = radius - (py as f64 + 0.5) * px_len;
            let d = (x * x + y * y).sqrt();
            if d > radius {
                return BACKGROUND;
            }
            if radius - d < px_len {
                return OUTLINE;
            }
            let z = surface_height(x, y, radius, &spheres);
            palette((z + radius) / (2.0 * radius))
        });

        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| BvolError::ArtifactPersistFailed(format!("png encode: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Highest atom surface above (x, y), clamped to the measurement sphere.
fn surface_height(x: f64, y: f64, radius: f64, spheres: &[Sphere]) -> f64 {
    let limit = (radius * radius - x * x - y * y).max(0.0).sqrt();
    spheres
        .iter()
        .filter_map(|s| {
            let dx = x - s.center.x;
            let dy = y - s.center.y;
            let h2 = s.radius * s.radius - dx * dx - dy * dy;
            (h2 >= 0.0).then(|| s.center.z + h2.sqrt())
        })
        .fold(-limit, f64::max)
        .clamp(-limit, limit)
}

fn palette(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let (a, b, f) = if t < 0.5 {
        (LOW, MID, t * 2.0)
    } else {
        (MID, HIGH, (t - 0.5) * 2.0)
    };
    let mix = |i: usize| (a[i] + (b[i] - a[i]) * f).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

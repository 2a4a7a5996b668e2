use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::engine::{BuriedVolume, BuriedVolumeParams, MeasurementEngine, SterimolParams};
use super::frame::{Sphere, occluding_spheres, orient};
use super::sterimol::sterimol;
use crate::error::{BvolError, Result};

pub const DEFAULT_SPHERE_RADIUS: f64 = 3.5;
/// Largest sphere radius accepted, in Angstroms. Work grows with the cube of
/// the radius, and a Sterimol-derived radius follows the upload's coordinates.
pub const MAX_SPHERE_RADIUS: f64 = 10.0;
pub const DEFAULT_RADII_SCALE: f64 = 1.17;
/// Grid spacing in Angstroms (one point per 0.001 A^3).
pub const DEFAULT_GRID_SPACING: f64 = 0.1;

/// Grid-based buried-volume engine with Bondi radii.
#[derive(Clone, Debug)]
pub struct NativeEngine {
    pub radius: f64,
    pub max_radius: f64,
    pub radii_scale: f64,
    pub spacing: f64,
    pub include_hydrogens: bool,
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self {
            radius: DEFAULT_SPHERE_RADIUS,
            max_radius: MAX_SPHERE_RADIUS,
            radii_scale: DEFAULT_RADII_SCALE,
            spacing: DEFAULT_GRID_SPACING,
            include_hydrogens: false,
        }
    }
}

impl NativeEngine {
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }
}

impl MeasurementEngine for NativeEngine {
    fn buried_volume(&self, params: &BuriedVolumeParams<'_>) -> Result<BuriedVolume> {
        let radius = params.radius.unwrap_or(self.radius);
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BvolError::measurement(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        if radius > self.max_radius {
            return Err(BvolError::measurement(format!(
                "sphere radius {radius:.2} exceeds the {:.2} A limit",
                self.max_radius
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(BvolError::measurement("grid spacing must be positive"));
        }

        let oriented = orient(params)?;
        let spheres = occluding_spheres(
            params,
            &oriented,
            radius,
            self.radii_scale,
            self.include_hydrogens,
        );
        let (inside, buried) = count_grid(radius, self.spacing, &spheres);
        tracing::debug!(
            center = params.center,
            radius,
            occluders = spheres.len(),
            inside,
            buried,
            "buried volume grid counted"
        );
        Ok(BuriedVolume {
            fraction: buried as f64 / inside as f64,
            radius,
        })
    }

    fn sterimol(
        &self,
        elements: &[String],
        coordinates: &[Point3<f64>],
        dummy: usize,
        attached: usize,
    ) -> Result<SterimolParams> {
        sterimol(elements, coordinates, dummy, attached)
    }
}

/// Counts grid points inside the sphere and those covered by any atom.
/// The origin is always a grid point, so `inside` is never zero.
fn count_grid(radius: f64, spacing: f64, spheres: &[Sphere]) -> (u64, u64) {
    let n = (radius / spacing).ceil() as i64;
    let r2 = radius * radius;
    (-n..=n)
        .into_par_iter()
        .map(|ix| {
            let x = ix as f64 * spacing;
            // Only atoms reaching this slab can cover its points.
            let slab: Vec<&Sphere> = spheres
                .iter()
                .filter(|s| (s.center.x - x).abs() <= s.radius)
                .collect();
            let mut inside = 0u64;
            let mut buried = 0u64;
            for iy in -n..=n {
                let y = iy as f64 * spacing;
                for iz in -n..=n {
                    let z = iz as f64 * spacing;
                    if x * x + y * y + z * z > r2 {
                        continue;
                    }
                    inside += 1;
                    let p = Vector3::new(x, y, z);
                    if slab.iter().any(|s| s.contains(&p)) {
                        buried += 1;
                    }
                }
            }
            (inside, buried)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
}

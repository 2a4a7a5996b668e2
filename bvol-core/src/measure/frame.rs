use nalgebra::{Rotation3, Unit, Vector3};

use super::engine::BuriedVolumeParams;
use crate::elements::{bondi_radius, is_hydrogen};
use crate::error::{BvolError, Result};

/// An atom sphere in the measurement frame (center atom at the origin).
#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Vector3<f64>,
    pub radius: f64,
}

impl Sphere {
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius
    }
}

pub fn check_index(idx: usize, n_atoms: usize, what: &str) -> Result<()> {
    if idx >= n_atoms {
        return Err(BvolError::measurement(format!(
            "{what} index {idx} out of range for {n_atoms} atoms"
        )));
    }
    Ok(())
}

/// Translates the center atom to the origin and, when z-axis atoms are
/// given, rotates so that +z points at their centroid.
pub fn orient(params: &BuriedVolumeParams<'_>) -> Result<Vec<Vector3<f64>>> {
    let n = params.coordinates.len();
    if params.elements.len() != n {
        return Err(BvolError::measurement(format!(
            "{} elements but {} coordinates",
            params.elements.len(),
            n
        )));
    }
    check_index(params.center, n, "center atom")?;
    for &i in params.excluded_atoms {
        check_index(i, n, "excluded atom")?;
    }
    for &i in params.z_axis_atoms {
        check_index(i, n, "z-axis atom")?;
    }

    let origin = params.coordinates[params.center];
    let shifted: Vec<Vector3<f64>> = params.coordinates.iter().map(|p| p - origin).collect();

    if params.z_axis_atoms.is_empty() {
        return Ok(shifted);
    }

    let centroid = params
        .z_axis_atoms
        .iter()
        .fold(Vector3::zeros(), |acc, &i| acc + shifted[i])
        / params.z_axis_atoms.len() as f64;
    let rot = rotation_onto_z(&centroid)?;
    Ok(shifted.into_iter().map(|v| rot * v).collect())
}

fn rotation_onto_z(axis: &Vector3<f64>) -> Result<Rotation3<f64>> {
    let axis = Unit::try_new(*axis, 1e-8).ok_or_else(|| {
        BvolError::measurement("z-axis atoms coincide with the center atom")
    })?;
    let z = Vector3::z();
    Ok(match Rotation3::rotation_between(axis.as_ref(), &z) {
        Some(rot) => rot,
        // Antiparallel: any half turn about an axis perpendicular to z works.
        None => Rotation3::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI),
    })
}

/// Atoms that can occlude a sphere of `radius` around the origin. The center
/// atom and excluded atoms never count; hydrogens only when asked for.
pub fn occluding_spheres(
    params: &BuriedVolumeParams<'_>,
    oriented: &[Vector3<f64>],
    radius: f64,
    radii_scale: f64,
    include_hydrogens: bool,
) -> Vec<Sphere> {
    oriented
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != params.center && !params.excluded_atoms.contains(i))
        .filter(|(i, _)| include_hydrogens || !is_hydrogen(&params.elements[*i]))
        .map(|(i, v)| Sphere {
            center: *v,
            radius: bondi_radius(&params.elements[i]) * radii_scale,
        })
        .filter(|s| s.center.norm() - s.radius < radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn params<'a>(
        elements: &'a [String],
        coords: &'a [Point3<f64>],
        z_axis: &'a [usize],
    ) -> BuriedVolumeParams<'a> {
        BuriedVolumeParams {
            elements,
            coordinates: coords,
            center: 0,
            excluded_atoms: &[],
            z_axis_atoms: z_axis,
            radius: None,
        }
    }

    fn symbols(s: &[&str]) -> Vec<String> {
        s.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn orient_moves_center_to_origin() {
        let el = symbols(&["Fe", "C"]);
        let coords = [Point3::new(1.0, 2.0, 3.0), Point3::new(2.0, 2.0, 3.0)];
        let out = orient(&params(&el, &coords, &[])).unwrap();
        assert!(out[0].norm() < 1e-12);
        assert!((out[1] - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn orient_points_z_at_axis_centroid() {
        let el = symbols(&["Fe", "C", "C"]);
        let coords = [
            Point3::origin(),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let out = orient(&params(&el, &coords, &[1, 2])).unwrap();
        let centroid = (out[1] + out[2]) / 2.0;
        assert!(centroid.x.abs() < 1e-9);
        assert!(centroid.y.abs() < 1e-9);
        assert!(centroid.z > 0.0);
    }

    #[test]
    fn orient_handles_antiparallel_axis() {
        let el = symbols(&["Fe", "C"]);
        let coords = [Point3::origin(), Point3::new(0.0, 0.0, -1.5)];
        let out = orient(&params(&el, &coords, &[1])).unwrap();
        assert!((out[1] - Vector3::new(0.0, 0.0, 1.5)).norm() < 1e-9);
    }

    #[test]
    fn degenerate_axis_is_rejected() {
        let el = symbols(&["Fe", "C"]);
        let coords = [Point3::origin(), Point3::origin()];
        assert!(matches!(
            orient(&params(&el, &coords, &[1])),
            Err(BvolError::MeasurementFailed(_))
        ));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let el = symbols(&["Fe"]);
        let coords = [Point3::origin()];
        assert!(orient(&params(&el, &coords, &[4])).is_err());
    }

    #[test]
    fn occluders_skip_center_excluded_hydrogens_and_far_atoms() {
        let el = symbols(&["Fe", "C", "H", "O", "C"]);
        let coords = [
            Point3::origin(),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.5, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(20.0, 0.0, 0.0),
        ];
        let mut p = params(&el, &coords, &[]);
        let excluded = [3];
        p.excluded_atoms = &excluded;
        let oriented = orient(&p).unwrap();
        let spheres = occluding_spheres(&p, &oriented, 3.5, 1.17, false);
        assert_eq!(spheres.len(), 1);
        assert!((spheres[0].radius - 1.70 * 1.17).abs() < 1e-12);

        let with_h = occluding_spheres(&p, &oriented, 3.5, 1.17, true);
        assert_eq!(with_h.len(), 2);
    }
}

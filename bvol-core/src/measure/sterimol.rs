use nalgebra::{Point3, Unit, Vector3};

use super::engine::SterimolParams;
use super::frame::check_index;
use crate::elements::bondi_radius;
use crate::error::{BvolError, Result};

/// Correction added to L so it matches the classic Verloop definition.
pub const L_CORRECTION: f64 = 0.40;

/// Angular step, in degrees, used to scan for the minimum width B1.
const B1_STEP_DEG: usize = 1;

/// Computes Sterimol L, B1 and B5 along the dummy -> attached axis.
///
/// The dummy atom only defines the axis and is left out of every width.
pub fn sterimol(
    elements: &[String],
    coordinates: &[Point3<f64>],
    dummy: usize,
    attached: usize,
) -> Result<SterimolParams> {
    let n = coordinates.len();
    if elements.len() != n {
        return Err(BvolError::measurement(format!(
            "{} elements but {} coordinates",
            elements.len(),
            n
        )));
    }
    check_index(dummy, n, "sterimol dummy atom")?;
    check_index(attached, n, "sterimol attached atom")?;
    if dummy == attached {
        return Err(BvolError::measurement(
            "sterimol dummy and attached atom must differ",
        ));
    }

    let origin = coordinates[attached];
    let axis = Unit::try_new(origin - coordinates[dummy], 1e-8).ok_or_else(|| {
        BvolError::measurement("sterimol dummy and attached atoms overlap")
    })?;

    // (projection on the axis, perpendicular component, vdW radius)
    let atoms: Vec<(f64, Vector3<f64>, f64)> = coordinates
        .iter()
        .zip(elements)
        .enumerate()
        .filter(|(i, _)| *i != dummy)
        .map(|(_, (p, e))| {
            let v = p - origin;
            let along = v.dot(&*axis);
            (along, v - *axis * along, bondi_radius(e))
        })
        .collect();

    let l = atoms
        .iter()
        .map(|(along, _, r)| along + r)
        .fold(f64::NEG_INFINITY, f64::max)
        + L_CORRECTION;

    let b5 = atoms
        .iter()
        .map(|(_, perp, r)| perp.norm() + r)
        .fold(f64::NEG_INFINITY, f64::max);

    let (e1, e2) = perpendicular_basis(&axis);
    let b1 = (0..360)
        .step_by(B1_STEP_DEG)
        .map(|deg| {
            let theta = (deg as f64).to_radians();
            let dir = e1 * theta.cos() + e2 * theta.sin();
            atoms
                .iter()
                .map(|(_, perp, r)| perp.dot(&dir) + r)
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .fold(f64::INFINITY, f64::min);

    Ok(SterimolParams { l, b1, b5 })
}

fn perpendicular_basis(axis: &Unit<Vector3<f64>>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let e1 = axis.cross(&helper).normalize();
    let e2 = axis.cross(&e1);
    (e1, e2)
}

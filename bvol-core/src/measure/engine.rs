use nalgebra::Point3;

use crate::error::Result;

/// Everything a buried-volume measurement needs. Indices are 0-based into
/// `elements`/`coordinates`.
#[derive(Clone, Copy, Debug)]
pub struct BuriedVolumeParams<'a> {
    pub elements: &'a [String],
    pub coordinates: &'a [Point3<f64>],
    pub center: usize,
    pub excluded_atoms: &'a [usize],
    /// Atoms whose centroid defines +z. Empty keeps the input orientation.
    pub z_axis_atoms: &'a [usize],
    /// Sphere radius in Angstroms; `None` lets the engine pick its default.
    pub radius: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuriedVolume {
    pub fraction: f64,
    /// Radius the engine actually used.
    pub radius: f64,
}

/// Sterimol shape parameters in Angstroms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SterimolParams {
    pub l: f64,
    pub b1: f64,
    pub b5: f64,
}

impl SterimolParams {
    /// Tightest of the three dimensions; used as the derived sphere radius.
    pub fn min_dimension(&self) -> f64 {
        self.l.min(self.b1).min(self.b5)
    }
}

pub trait MeasurementEngine: Send + Sync {
    fn buried_volume(&self, params: &BuriedVolumeParams<'_>) -> Result<BuriedVolume>;

    fn sterimol(
        &self,
        elements: &[String],
        coordinates: &[Point3<f64>],
        dummy: usize,
        attached: usize,
    ) -> Result<SterimolParams>;
}

pub trait StericMapRenderer: Send + Sync {
    /// Renders the steric map as encoded PNG bytes.
    fn render(&self, params: &BuriedVolumeParams<'_>, measured: &BuriedVolume) -> Result<Vec<u8>>;
}

use std::sync::Arc;

use crate::center::resolve_center;
use crate::error::{BvolError, Result};
use crate::measure::engine::{BuriedVolumeParams, MeasurementEngine, StericMapRenderer};
use crate::xyz::Structure;

/// Sterimol axis used for the derived radius: the first atom is the dummy,
/// the second the attached atom.
pub const STERIMOL_DUMMY_ATOM: usize = 0;
pub const STERIMOL_ATTACHED_ATOM: usize = 1;

/// Per-upload measurement options. All indices are 0-based.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub excluded_atoms: Vec<usize>,
    /// Atoms defining the steric-map axis; empty means no map.
    pub z_axis_atoms: Vec<usize>,
    /// Center candidates used only when the structure has no metallic atom.
    pub fallback_centers: Vec<usize>,
    /// Derive the sphere radius from Sterimol parameters.
    pub use_sterimol: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub center: usize,
    pub radius: f64,
    pub buried_volume_fraction: f64,
    /// Encoded steric map, present iff z-axis atoms were requested.
    pub steric_map: Option<Vec<u8>>,
}

impl Analysis {
    pub fn has_artifact(&self) -> bool {
        self.steric_map.is_some()
    }
}

#[derive(Clone)]
pub struct Analyzer {
    engine: Arc<dyn MeasurementEngine>,
    renderer: Arc<dyn StericMapRenderer>,
}

impl Analyzer {
    pub fn new(engine: Arc<dyn MeasurementEngine>, renderer: Arc<dyn StericMapRenderer>) -> Self {
        Self { engine, renderer }
    }

    pub fn analyze(&self, structure: &Structure, req: &AnalysisRequest) -> Result<Analysis> {
        let center = resolve_center(&structure.elements, &req.fallback_centers)?;
        tracing::debug!(center, element = ?structure.elements.get(center), "center resolved");

        let radius = if req.use_sterimol {
            let params = self
                .engine
                .sterimol(
                    &structure.elements,
                    &structure.coordinates,
                    STERIMOL_DUMMY_ATOM,
                    STERIMOL_ATTACHED_ATOM,
                )
                .map_err(as_measurement)?;
            let r = params.min_dimension();
            tracing::debug!(l = params.l, b1 = params.b1, b5 = params.b5, radius = r, "sterimol radius");
            Some(r)
        } else {
            None
        };

        let params = BuriedVolumeParams {
            elements: &structure.elements,
            coordinates: &structure.coordinates,
            center,
            excluded_atoms: &req.excluded_atoms,
            z_axis_atoms: &req.z_axis_atoms,
            radius,
        };
        let measured = self.engine.buried_volume(&params).map_err(as_measurement)?;

        let steric_map = if req.z_axis_atoms.is_empty() {
            None
        } else {
            let png = self
                .renderer
                .render(&params, &measured)
                .map_err(as_persist)?;
            Some(png)
        };

        Ok(Analysis {
            center,
            radius: measured.radius,
            buried_volume_fraction: measured.fraction,
            steric_map,
        })
    }
}

fn as_measurement(e: BvolError) -> BvolError {
    match e {
        BvolError::MeasurementFailed(_) => e,
        other => BvolError::MeasurementFailed(other.to_string()),
    }
}

fn as_persist(e: BvolError) -> BvolError {
    match e {
        BvolError::ArtifactPersistFailed(_) => e,
        other => BvolError::ArtifactPersistFailed(other.to_string()),
    }
}

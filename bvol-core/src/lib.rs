#![forbid(unsafe_code)]

pub mod center;
pub mod elements;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod xyz;

pub mod measure {
    pub mod engine;
    pub mod frame;
    pub mod native;
    pub mod render;
    pub mod sterimol;
}

pub mod store {
    pub mod artifacts;
    pub mod records;
}

// Re-exports: stable API surface
pub use center::resolve_center;
pub use error::{BvolError, Result};
pub use measure::engine::{
    BuriedVolume, BuriedVolumeParams, MeasurementEngine, StericMapRenderer, SterimolParams,
};
pub use measure::native::NativeEngine;
pub use measure::render::NativeRenderer;
pub use pipeline::{Analysis, AnalysisRequest, Analyzer};
pub use registry::MoleculeRegistry;
pub use store::artifacts::{ArtifactStore, FsArtifactStore, MemArtifactStore};
pub use store::records::{MoleculeRecord, RecordStore};
pub use xyz::{Structure, XyzError, read_xyz};

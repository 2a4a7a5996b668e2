use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use bvol_core::{Analyzer, FsArtifactStore, MoleculeRegistry, NativeEngine, NativeRenderer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{add_molecule, delete_molecule, get_plot, list_molecules};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MoleculeRegistry>,
}

impl AppState {
    pub fn new(registry: MoleculeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Native engine and renderer, steric maps stored under `plots_dir`.
    pub fn native(plots_dir: &Path) -> bvol_core::Result<Self> {
        let analyzer = Analyzer::new(
            Arc::new(NativeEngine::default()),
            Arc::new(NativeRenderer::default()),
        );
        let artifacts = FsArtifactStore::open(plots_dir)?;
        Ok(Self::new(MoleculeRegistry::new(analyzer, Arc::new(artifacts))))
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/Molecules", get(list_molecules).post(add_molecule))
        .route("/{id}", get(get_plot).delete(delete_molecule))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

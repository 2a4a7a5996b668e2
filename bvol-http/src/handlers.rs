use std::io::{BufReader, Seek, SeekFrom, Write};

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bvol_core::{AnalysisRequest, MoleculeRecord, MoleculeRegistry, read_xyz};

use crate::app::AppState;
use crate::error::ApiError;
use crate::form::read_upload;
use crate::payload::{MoleculeView, MoleculesBody, STATUS_REMOVED, STATUS_SUCCESS, StatusBody};

pub async fn list_molecules(State(state): State<AppState>) -> Json<MoleculesBody> {
    let molecules = state
        .registry
        .list()
        .into_iter()
        .map(MoleculeView::from)
        .collect();
    Json(MoleculesBody {
        status: STATUS_SUCCESS,
        molecules,
    })
}

pub async fn add_molecule(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StatusBody>, ApiError> {
    let form = read_upload(multipart).await?;
    let registry = state.registry.clone();

    let record =
        tokio::task::spawn_blocking(move || ingest_upload(&registry, &form.file, &form.request))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    tracing::info!(id = %record.id, name = %record.name, "upload processed");
    Ok(Json(StatusBody::new(STATUS_SUCCESS, "molecule added!")))
}

/// Spools the upload to a temporary file, parses it and runs the pipeline.
/// The temporary file is removed when this returns, on success or failure.
fn ingest_upload(
    registry: &MoleculeRegistry,
    upload: &[u8],
    request: &AnalysisRequest,
) -> Result<MoleculeRecord, ApiError> {
    let mut spool = tempfile::NamedTempFile::new()?;
    spool.write_all(upload)?;
    spool.seek(SeekFrom::Start(0))?;

    let structure = read_xyz(&mut BufReader::new(spool.as_file()))?;
    tracing::debug!(name = %structure.name, atoms = structure.len(), "structure parsed");

    Ok(registry.ingest(&structure, request)?)
}

pub async fn get_plot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let registry = state.registry.clone();
    let bytes = tokio::task::spawn_blocking(move || registry.artifact_bytes(&id))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

pub async fn delete_molecule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusBody>, ApiError> {
    let registry = state.registry.clone();
    let removed = tokio::task::spawn_blocking(move || registry.delete(&id))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    if !removed {
        return Err(ApiError::MoleculeNotFound);
    }
    Ok(Json(StatusBody::new(STATUS_REMOVED, "molecule Removed!")))
}

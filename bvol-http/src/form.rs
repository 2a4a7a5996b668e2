use axum::body::Bytes;
use axum::extract::Multipart;
use bvol_core::AnalysisRequest;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub const FIELD_FILE: &str = "file";
pub const FIELD_EXCLUDED: &str = "numToIgnoreList";
pub const FIELD_Z_AXIS: &str = "zaxisatoms";
pub const FIELD_FALLBACK: &str = "nonmetalic";
pub const FIELD_STERIMOL: &str = "useSterimol";

/// A decoded `POST /Molecules` form.
#[derive(Debug)]
pub struct UploadForm {
    pub file: Bytes,
    pub request: AnalysisRequest,
}

/// Reads every field of the upload form. All five fields are required;
/// unknown fields are ignored. Atom indices arrive 1-based and are returned
/// 0-based.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut file = None;
    let mut excluded = None;
    let mut z_axis = None;
    let mut fallback = None;
    let mut sterimol = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::BadField {
        field: "multipart",
        reason: e.body_text(),
    })? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            FIELD_FILE => {
                let bytes = field.bytes().await.map_err(|e| ApiError::BadField {
                    field: FIELD_FILE,
                    reason: e.body_text(),
                })?;
                file = Some(bytes);
            }
            FIELD_EXCLUDED => excluded = Some(json_field(FIELD_EXCLUDED, field).await?),
            FIELD_Z_AXIS => z_axis = Some(json_field(FIELD_Z_AXIS, field).await?),
            FIELD_FALLBACK => fallback = Some(json_field(FIELD_FALLBACK, field).await?),
            FIELD_STERIMOL => sterimol = Some(json_field(FIELD_STERIMOL, field).await?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(UploadForm {
        file: file.ok_or(ApiError::MissingField(FIELD_FILE))?,
        request: AnalysisRequest {
            excluded_atoms: zero_based(
                FIELD_EXCLUDED,
                excluded.ok_or(ApiError::MissingField(FIELD_EXCLUDED))?,
            )?,
            z_axis_atoms: zero_based(
                FIELD_Z_AXIS,
                z_axis.ok_or(ApiError::MissingField(FIELD_Z_AXIS))?,
            )?,
            fallback_centers: zero_based(
                FIELD_FALLBACK,
                fallback.ok_or(ApiError::MissingField(FIELD_FALLBACK))?,
            )?,
            use_sterimol: sterimol.ok_or(ApiError::MissingField(FIELD_STERIMOL))?,
        },
    })
}

async fn json_field<T: DeserializeOwned>(
    name: &'static str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<T, ApiError> {
    let text = field.text().await.map_err(|e| ApiError::BadField {
        field: name,
        reason: e.body_text(),
    })?;
    parse_json_field(name, &text)
}

/// Form atom indices count from 1.
pub fn zero_based(field: &'static str, indices: Vec<usize>) -> Result<Vec<usize>, ApiError> {
    indices
        .into_iter()
        .map(|i| {
            i.checked_sub(1).ok_or_else(|| ApiError::BadField {
                field,
                reason: "atom indices start at 1".into(),
            })
        })
        .collect()
}

pub fn parse_json_field<T: DeserializeOwned>(name: &'static str, text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text.trim()).map_err(|e| ApiError::BadField {
        field: name,
        reason: e.to_string(),
    })
}

use bvol_core::MoleculeRecord;
use serde::Serialize;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";
// Legacy clients match on this exact spelling.
pub const STATUS_REMOVED: &str = "succss";

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: String,
}

impl StatusBody {
    pub fn new(status: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoleculesBody {
    pub status: &'static str,
    pub molecules: Vec<MoleculeView>,
}

/// Wire shape of a record; field names are the historical ones.
#[derive(Debug, Serialize)]
pub struct MoleculeView {
    pub id: String,
    #[serde(rename = "fName")]
    pub name: String,
    #[serde(rename = "Mass")]
    pub buried_volume_fraction: f64,
}

impl From<MoleculeRecord> for MoleculeView {
    fn from(r: MoleculeRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            buried_volume_fraction: r.buried_volume_fraction,
        }
    }
}

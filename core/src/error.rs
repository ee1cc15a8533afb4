use thiserror::Error;

use crate::types::{ShiftType, StaffId};

#[derive(Error, Debug)]
pub enum RotaError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid floor config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid staff record {staff_id}: {reason}")]
    InvalidStaff { staff_id: StaffId, reason: String },

    #[error("Unknown availability status code '{code}'")]
    UnknownStatusCode { code: String },

    #[error("No saved rota for {date} ({shift})")]
    RotaNotFound { date: String, shift: ShiftType },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RotaResult<T> = Result<T, RotaError>;

//! Sections shared by more than one message type.
use chrono::{DateTime, Utc};

use crate::decode::Record;
use crate::schema::COVARIANCE_TERMS;

/// Message header. The layout is the same for all ODM messages except for the name of the
/// version key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    /// Format version, e.g., `CCSDS_OPM_VERS`
    pub version: String,
    pub comments: Vec<String>,
    pub classification: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub originator: String,
    pub message_id: Option<String>,
}

impl Header {
    pub(crate) fn from_record(mut rec: Record, version_key: &str) -> Self {
        Self {
            version: rec.text(version_key).unwrap_or_default(),
            comments: rec.comments(),
            classification: rec.text("CLASSIFICATION"),
            creation_date: rec.epoch("CREATION_DATE").unwrap_or_default(),
            originator: rec.text("ORIGINATOR").unwrap_or_default(),
            message_id: rec.text("MESSAGE_ID"),
        }
    }
}

/// Spacecraft physical parameters used for drag and solar radiation pressure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacecraftParameters {
    pub comments: Vec<String>,
    /// kg
    pub mass: Option<f64>,
    /// m**2
    pub solar_rad_area: Option<f64>,
    pub solar_rad_coeff: Option<f64>,
    /// m**2
    pub drag_area: Option<f64>,
    pub drag_coeff: Option<f64>,
}

impl SpacecraftParameters {
    pub(crate) fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            mass: rec.real("MASS"),
            solar_rad_area: rec.real("SOLAR_RAD_AREA"),
            solar_rad_coeff: rec.real("SOLAR_RAD_COEFF"),
            drag_area: rec.real("DRAG_AREA"),
            drag_coeff: rec.real("DRAG_COEFF"),
        }
    }
}

/// 6x6 position/velocity covariance, stored as its lower triangle.
///
/// Units are km**2, km**2/s, or km**2/s**2 depending on the term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CovarianceMatrix {
    pub comments: Vec<String>,
    /// Omitted when the same as the metadata `REF_FRAME`
    pub cov_ref_frame: Option<String>,
    /// Terms in document order, `CX_X`, `CY_X`, `CY_Y`, ..., `CZ_DOT_Z_DOT`
    pub lower_triangle: [Option<f64>; 21],
}

impl CovarianceMatrix {
    pub(crate) fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            cov_ref_frame: rec.text("COV_REF_FRAME"),
            lower_triangle: COVARIANCE_TERMS.map(|key| rec.real(key)),
        }
    }

    /// Covariance term for `row` and `col`, each in `0..6` ordered x, y, z, x_dot, y_dot,
    /// z_dot. The matrix is symmetric so the order of `row` and `col` does not matter.
    ///
    /// Returns `None` if the term was not provided or the index is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= 6 || col >= 6 {
            return None;
        }
        let (row, col) = if row >= col { (row, col) } else { (col, row) };
        self.lower_triangle[row * (row + 1) / 2 + col]
    }

    /// True if no term or reference frame was provided; comments are not considered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cov_ref_frame.is_none() && self.lower_triangle.iter().all(Option::is_none)
    }
}

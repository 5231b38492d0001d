//! Orbit Mean-elements Message (OMM).
//!
//! Reference: [Orbit Data Messages](https://public.ccsds.org/Pubs/502x0b3e1.pdf), section 4.
use chrono::{DateTime, Utc};

use crate::common::{CovarianceMatrix, Header, SpacecraftParameters};
use crate::decode::{Extensions, Record};
use crate::decoder::{Decoder, Message};
use crate::prelude::*;
use crate::schema::{
    header, Field, Kind, COVARIANCE, COVARIANCE_MATRIX, DATA, HEADER, METADATA, SPACECRAFT,
    SPACECRAFT_PARAMETERS,
};

const VERSION_KEY: &str = "CCSDS_OMM_VERS";
const MEAN_ELEMENTS: &str = "MEAN_ELEMENTS";
const TLE_PARAMETERS: &str = "TLE_PARAMETERS";

const OMM_HEADER: &[Field] = header!(VERSION_KEY);

const OMM_METADATA: &[Field] = &[
    Field::comments(),
    Field::required("OBJECT_NAME", Kind::Text),
    Field::required("OBJECT_ID", Kind::Text),
    Field::required("CENTER_NAME", Kind::Text),
    Field::required("REF_FRAME", Kind::Text),
    Field::optional("REF_FRAME_EPOCH", Kind::Epoch),
    Field::required("TIME_SYSTEM", Kind::Text),
    Field::optional("MEAN_ELEMENT_THEORY", Kind::Text),
];

const OMM_MEAN_ELEMENTS: &[Field] = &[
    Field::comments(),
    Field::required("EPOCH", Kind::Epoch),
    Field::optional("SEMI_MAJOR_AXIS", Kind::Real),
    Field::optional("MEAN_MOTION", Kind::Real),
    Field::required("ECCENTRICITY", Kind::Real),
    Field::required("INCLINATION", Kind::Real),
    Field::required("RA_OF_ASC_NODE", Kind::Real),
    Field::required("ARG_OF_PERICENTER", Kind::Real),
    Field::required("MEAN_ANOMALY", Kind::Real),
    Field::optional("GM", Kind::Real),
];

const OMM_TLE_PARAMETERS: &[Field] = &[
    Field::comments(),
    Field::optional("EPHEMERIS_TYPE", Kind::Text),
    Field::optional("CLASSIFICATION_TYPE", Kind::Text),
    Field::optional("NORAD_CAT_ID", Kind::Integer),
    Field::optional("ELEMENT_SET_NO", Kind::Integer),
    Field::optional("REV_AT_EPOCH", Kind::Integer),
    Field::optional("BSTAR", Kind::Real),
    Field::optional("BTERM", Kind::Real),
    Field::optional("MEAN_MOTION_DOT", Kind::Real),
    Field::optional("MEAN_MOTION_DDOT", Kind::Real),
    Field::optional("AGOM", Kind::Real),
];

const OMM_DATA: &[Field] = &[
    Field::group(MEAN_ELEMENTS, OMM_MEAN_ELEMENTS),
    Field::group(SPACECRAFT_PARAMETERS, SPACECRAFT),
    Field::group(TLE_PARAMETERS, OMM_TLE_PARAMETERS),
    Field::group(COVARIANCE_MATRIX, COVARIANCE),
];

/// OMM field directory, tables 4-1, 4-2, and 4-3.
pub static SCHEMA: &[Field] = &[
    Field::group(HEADER, OMM_HEADER),
    Field::group(METADATA, OMM_METADATA),
    Field::group(DATA, OMM_DATA),
];

/// A decoded Orbit Mean-elements Message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Omm {
    pub header: Header,
    pub metadata: Metadata,
    pub data: Data,
    /// Trimmed source text of the message
    pub raw: String,
}

impl Omm {
    /// Decode `text` using the default [Decoder].
    ///
    /// # Errors
    /// See [crate::Error].
    pub fn decode(text: &str) -> Result<Self> {
        Decoder::default().decode(text)
    }
}

impl Message for Omm {
    const NAME: &'static str = "OMM";

    fn schema() -> &'static [Field] {
        SCHEMA
    }

    fn from_parts(
        mut record: Record,
        extensions: Extensions,
        raw: String,
        _decoder: &Decoder,
    ) -> Result<Self> {
        Ok(Self {
            header: Header::from_record(record.record(HEADER), VERSION_KEY),
            metadata: Metadata::from_record(record.record(METADATA)),
            data: Data::from_record(record.record(DATA), extensions),
            raw,
        })
    }
}

/// OMM metadata, table 4-2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub comments: Vec<String>,
    pub object_name: String,
    pub object_id: String,
    pub center_name: String,
    pub ref_frame: String,
    pub ref_frame_epoch: Option<DateTime<Utc>>,
    pub time_system: String,
    /// e.g., `SGP/SGP4`
    pub mean_element_theory: Option<String>,
}

impl Metadata {
    fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            object_name: rec.text("OBJECT_NAME").unwrap_or_default(),
            object_id: rec.text("OBJECT_ID").unwrap_or_default(),
            center_name: rec.text("CENTER_NAME").unwrap_or_default(),
            ref_frame: rec.text("REF_FRAME").unwrap_or_default(),
            ref_frame_epoch: rec.epoch("REF_FRAME_EPOCH"),
            time_system: rec.text("TIME_SYSTEM").unwrap_or_default(),
            mean_element_theory: rec.text("MEAN_ELEMENT_THEORY"),
        }
    }
}

/// OMM data, table 4-3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    pub mean_elements: MeanElements,
    pub spacecraft_parameters: SpacecraftParameters,
    pub tle_parameters: TleParameters,
    pub covariance_matrix: CovarianceMatrix,
    /// `USER_DEFINED_*` parameters
    pub user_defined: Extensions,
}

impl Data {
    fn from_record(mut rec: Record, user_defined: Extensions) -> Self {
        Self {
            mean_elements: MeanElements::from_record(rec.record(MEAN_ELEMENTS)),
            spacecraft_parameters: SpacecraftParameters::from_record(
                rec.record(SPACECRAFT_PARAMETERS),
            ),
            tle_parameters: TleParameters::from_record(rec.record(TLE_PARAMETERS)),
            covariance_matrix: CovarianceMatrix::from_record(rec.record(COVARIANCE_MATRIX)),
            user_defined,
        }
    }
}

/// Mean Keplerian elements. One of `semi_major_axis` or `mean_motion` is expected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeanElements {
    pub comments: Vec<String>,
    pub epoch: DateTime<Utc>,
    /// km
    pub semi_major_axis: Option<f64>,
    /// rev/day
    pub mean_motion: Option<f64>,
    pub eccentricity: f64,
    /// deg
    pub inclination: f64,
    /// deg
    pub ra_of_asc_node: f64,
    /// deg
    pub arg_of_pericenter: f64,
    /// deg
    pub mean_anomaly: f64,
    /// km**3/s**2
    pub gm: Option<f64>,
}

impl MeanElements {
    fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            epoch: rec.epoch("EPOCH").unwrap_or_default(),
            semi_major_axis: rec.real("SEMI_MAJOR_AXIS"),
            mean_motion: rec.real("MEAN_MOTION"),
            eccentricity: rec.real("ECCENTRICITY").unwrap_or_default(),
            inclination: rec.real("INCLINATION").unwrap_or_default(),
            ra_of_asc_node: rec.real("RA_OF_ASC_NODE").unwrap_or_default(),
            arg_of_pericenter: rec.real("ARG_OF_PERICENTER").unwrap_or_default(),
            mean_anomaly: rec.real("MEAN_ANOMALY").unwrap_or_default(),
            gm: rec.real("GM"),
        }
    }
}

/// Parameters used with the SGP/SGP4 family of mean element theories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TleParameters {
    pub comments: Vec<String>,
    pub ephemeris_type: Option<String>,
    pub classification_type: Option<String>,
    pub norad_cat_id: Option<u64>,
    pub element_set_no: Option<u64>,
    pub rev_at_epoch: Option<u64>,
    /// 1/ER
    pub bstar: Option<f64>,
    /// m**2/kg
    pub bterm: Option<f64>,
    /// rev/day**2
    pub mean_motion_dot: Option<f64>,
    /// rev/day**3
    pub mean_motion_ddot: Option<f64>,
    /// m**2/kg
    pub agom: Option<f64>,
}

impl TleParameters {
    fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            ephemeris_type: rec.text("EPHEMERIS_TYPE"),
            classification_type: rec.text("CLASSIFICATION_TYPE"),
            norad_cat_id: rec.integer("NORAD_CAT_ID"),
            element_set_no: rec.integer("ELEMENT_SET_NO"),
            rev_at_epoch: rec.integer("REV_AT_EPOCH"),
            bstar: rec.real("BSTAR"),
            bterm: rec.real("BTERM"),
            mean_motion_dot: rec.real("MEAN_MOTION_DOT"),
            mean_motion_ddot: rec.real("MEAN_MOTION_DDOT"),
            agom: rec.real("AGOM"),
        }
    }
}

//! Orbit Parameter Message (OPM).
//!
//! Reference: [Orbit Data Messages](https://public.ccsds.org/Pubs/502x0b3e1.pdf), section 3.
use chrono::{DateTime, Utc};

use crate::common::{CovarianceMatrix, Header, SpacecraftParameters};
use crate::decode::{Extensions, Record};
use crate::decoder::{Decoder, Message};
use crate::prelude::*;
use crate::schema::{
    header, Field, Kind, COVARIANCE, COVARIANCE_MATRIX, DATA, HEADER, METADATA, SPACECRAFT,
    SPACECRAFT_PARAMETERS,
};
use crate::validate;

const VERSION_KEY: &str = "CCSDS_OPM_VERS";
const STATE_VECTOR: &str = "STATE_VECTOR";
const KEPLERIAN_ELEMENTS: &str = "KEPLERIAN_ELEMENTS";
const MANEUVERS: &str = "MANEUVERS";

const OPM_HEADER: &[Field] = header!(VERSION_KEY);

const OPM_METADATA: &[Field] = &[
    Field::comments(),
    Field::required("OBJECT_NAME", Kind::Text),
    Field::required("OBJECT_ID", Kind::Text),
    Field::required("CENTER_NAME", Kind::Text),
    Field::required("REF_FRAME", Kind::Text),
    Field::optional("REF_FRAME_EPOCH", Kind::Epoch),
    Field::required("TIME_SYSTEM", Kind::Text),
];

const OPM_STATE_VECTOR: &[Field] = &[
    Field::comments(),
    Field::required("EPOCH", Kind::Epoch),
    Field::required("X", Kind::Real),
    Field::required("Y", Kind::Real),
    Field::required("Z", Kind::Real),
    Field::required("X_DOT", Kind::Real),
    Field::required("Y_DOT", Kind::Real),
    Field::required("Z_DOT", Kind::Real),
];

const OPM_KEPLERIAN: &[Field] = &[
    Field::comments(),
    Field::optional("SEMI_MAJOR_AXIS", Kind::Real),
    Field::optional("ECCENTRICITY", Kind::Real),
    Field::optional("INCLINATION", Kind::Real),
    Field::optional("RA_OF_ASC_NODE", Kind::Real),
    Field::optional("ARG_OF_PERICENTER", Kind::Real),
    Field::optional("TRUE_ANOMALY", Kind::Real),
    Field::optional("MEAN_ANOMALY", Kind::Real),
    Field::optional("GM", Kind::Real),
];

const OPM_MANEUVER: &[Field] = &[
    Field::comments(),
    Field::required("MAN_EPOCH_IGNITION", Kind::Epoch),
    Field::required("MAN_DURATION", Kind::Real),
    Field::required("MAN_DELTA_MASS", Kind::Real),
    Field::required("MAN_REF_FRAME", Kind::Text),
    Field::required("MAN_DV_1", Kind::Real),
    Field::required("MAN_DV_2", Kind::Real),
    Field::required("MAN_DV_3", Kind::Real),
];

const OPM_DATA: &[Field] = &[
    Field::group(STATE_VECTOR, OPM_STATE_VECTOR),
    Field::group(KEPLERIAN_ELEMENTS, OPM_KEPLERIAN),
    Field::group(SPACECRAFT_PARAMETERS, SPACECRAFT),
    Field::group(COVARIANCE_MATRIX, COVARIANCE),
    Field::list(MANEUVERS, OPM_MANEUVER),
];

/// OPM field directory, tables 3-1, 3-2, and 3-3.
pub static SCHEMA: &[Field] = &[
    Field::group(HEADER, OPM_HEADER),
    Field::group(METADATA, OPM_METADATA),
    Field::group(DATA, OPM_DATA),
];

/// A decoded Orbit Parameter Message.
///
/// # Example
/// ```
/// use odm::opm::Opm;
///
/// let text = "\
/// CCSDS_OPM_VERS = 3.0
/// CREATION_DATE = 2022-11-06T09:23:57
/// ORIGINATOR = JAXA
/// OBJECT_NAME = OSPREY 5
/// OBJECT_ID = 1998-999A
/// CENTER_NAME = EARTH
/// REF_FRAME = ITRF2000
/// TIME_SYSTEM = UTC
/// EPOCH = 2022-12-18T14:28:15.1172
/// X = 6503.514000 [km]
/// Y = 1239.647000 [km]
/// Z = -717.490000 [km]
/// X_DOT = -0.873160 [km/s]
/// Y_DOT = 8.740420 [km/s]
/// Z_DOT = -4.191076 [km/s]";
///
/// let opm = Opm::decode(text).unwrap();
/// assert_eq!(opm.metadata.object_name, "OSPREY 5");
/// assert_eq!(opm.data.state_vector.z, -717.49);
/// assert!(opm.data.maneuvers.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opm {
    pub header: Header,
    pub metadata: Metadata,
    pub data: Data,
    /// Trimmed source text of the message
    pub raw: String,
}

impl Opm {
    /// Decode `text` using the default [Decoder].
    ///
    /// # Errors
    /// See [crate::Error].
    pub fn decode(text: &str) -> Result<Self> {
        Decoder::default().decode(text)
    }
}

impl Message for Opm {
    const NAME: &'static str = "OPM";

    fn schema() -> &'static [Field] {
        SCHEMA
    }

    fn from_parts(
        mut record: Record,
        extensions: Extensions,
        raw: String,
        decoder: &Decoder,
    ) -> Result<Self> {
        let mut data = Data::from_record(record.record(DATA), extensions);

        validate::check_anomalies(&data.keplerian_elements)?;
        if decoder.relocate_comments() {
            validate::relocate_covariance_comments(
                &mut data.covariance_matrix,
                &mut data.maneuvers,
            );
        }

        Ok(Self {
            header: Header::from_record(record.record(HEADER), VERSION_KEY),
            metadata: Metadata::from_record(record.record(METADATA)),
            data,
            raw,
        })
    }
}

/// OPM metadata, table 3-2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub comments: Vec<String>,
    pub object_name: String,
    pub object_id: String,
    pub center_name: String,
    pub ref_frame: String,
    /// Only present if not intrinsic to the reference frame
    pub ref_frame_epoch: Option<DateTime<Utc>>,
    pub time_system: String,
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
        }
    }
}

/// OPM data, table 3-3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    pub state_vector: StateVector,
    pub keplerian_elements: KeplerianElements,
    pub spacecraft_parameters: SpacecraftParameters,
    pub covariance_matrix: CovarianceMatrix,
    pub maneuvers: Vec<Maneuver>,
    /// `USER_DEFINED_*` parameters
    pub user_defined: Extensions,
}

impl Data {
    fn from_record(mut rec: Record, user_defined: Extensions) -> Self {
        Self {
            state_vector: StateVector::from_record(rec.record(STATE_VECTOR)),
            keplerian_elements: KeplerianElements::from_record(rec.record(KEPLERIAN_ELEMENTS)),
            spacecraft_parameters: SpacecraftParameters::from_record(
                rec.record(SPACECRAFT_PARAMETERS),
            ),
            covariance_matrix: CovarianceMatrix::from_record(rec.record(COVARIANCE_MATRIX)),
            maneuvers: rec
                .list(MANEUVERS)
                .into_iter()
                .map(Maneuver::from_record)
                .collect(),
            user_defined,
        }
    }
}

/// Cartesian position (km) and velocity (km/s) at `epoch`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateVector {
    pub comments: Vec<String>,
    pub epoch: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub x_dot: f64,
    pub y_dot: f64,
    pub z_dot: f64,
}

impl StateVector {
    fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            epoch: rec.epoch("EPOCH").unwrap_or_default(),
            x: rec.real("X").unwrap_or_default(),
            y: rec.real("Y").unwrap_or_default(),
            z: rec.real("Z").unwrap_or_default(),
            x_dot: rec.real("X_DOT").unwrap_or_default(),
            y_dot: rec.real("Y_DOT").unwrap_or_default(),
            z_dot: rec.real("Z_DOT").unwrap_or_default(),
        }
    }
}

/// Osculating Keplerian elements. Only one of `true_anomaly` and `mean_anomaly` may be
/// provided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeplerianElements {
    pub comments: Vec<String>,
    /// km
    pub semi_major_axis: Option<f64>,
    pub eccentricity: Option<f64>,
    /// deg
    pub inclination: Option<f64>,
    /// deg
    pub ra_of_asc_node: Option<f64>,
    /// deg
    pub arg_of_pericenter: Option<f64>,
    /// deg
    pub true_anomaly: Option<f64>,
    /// deg
    pub mean_anomaly: Option<f64>,
    /// km**3/s**2
    pub gm: Option<f64>,
}

impl KeplerianElements {
    fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            semi_major_axis: rec.real("SEMI_MAJOR_AXIS"),
            eccentricity: rec.real("ECCENTRICITY"),
            inclination: rec.real("INCLINATION"),
            ra_of_asc_node: rec.real("RA_OF_ASC_NODE"),
            arg_of_pericenter: rec.real("ARG_OF_PERICENTER"),
            true_anomaly: rec.real("TRUE_ANOMALY"),
            mean_anomaly: rec.real("MEAN_ANOMALY"),
            gm: rec.real("GM"),
        }
    }
}

/// A single planned or executed maneuver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Maneuver {
    pub comments: Vec<String>,
    pub epoch_ignition: DateTime<Utc>,
    /// s
    pub duration: f64,
    /// kg, always negative
    pub delta_mass: f64,
    pub ref_frame: String,
    /// km/s
    pub dv_1: f64,
    /// km/s
    pub dv_2: f64,
    /// km/s
    pub dv_3: f64,
}

impl Maneuver {
    fn from_record(mut rec: Record) -> Self {
        Self {
            comments: rec.comments(),
            epoch_ignition: rec.epoch("MAN_EPOCH_IGNITION").unwrap_or_default(),
            duration: rec.real("MAN_DURATION").unwrap_or_default(),
            delta_mass: rec.real("MAN_DELTA_MASS").unwrap_or_default(),
            ref_frame: rec.text("MAN_REF_FRAME").unwrap_or_default(),
            dv_1: rec.real("MAN_DV_1").unwrap_or_default(),
            dv_2: rec.real("MAN_DV_2").unwrap_or_default(),
            dv_3: rec.real("MAN_DV_3").unwrap_or_default(),
        }
    }
}

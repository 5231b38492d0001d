//! Orbit Ephemeris Message (OEM).
//!
//! Only the header and the first metadata section are decoded; ephemeris data lines and
//! covariance sections are not supported.
//!
//! Reference: [Orbit Data Messages](https://public.ccsds.org/Pubs/502x0b3e1.pdf), section 5.
use chrono::{DateTime, Utc};

use crate::common::Header;
use crate::decode::{Extensions, Record};
use crate::decoder::{Decoder, Message};
use crate::prelude::*;
use crate::schema::{header, Field, Kind, HEADER, METADATA};

const VERSION_KEY: &str = "CCSDS_OEM_VERS";

const OEM_HEADER: &[Field] = header!(VERSION_KEY);

const OEM_METADATA: &[Field] = &[
    Field::comments(),
    Field::required("OBJECT_NAME", Kind::Text),
    Field::required("OBJECT_ID", Kind::Text),
    Field::required("CENTER_NAME", Kind::Text),
    Field::required("REF_FRAME", Kind::Text),
    Field::optional("REF_FRAME_EPOCH", Kind::Epoch),
    Field::required("TIME_SYSTEM", Kind::Text),
    Field::required("START_TIME", Kind::Epoch),
    Field::optional("USEABLE_START_TIME", Kind::Epoch),
    Field::optional("USEABLE_STOP_TIME", Kind::Epoch),
    Field::required("STOP_TIME", Kind::Epoch),
    Field::optional("INTERPOLATION", Kind::Text),
    Field::optional("INTERPOLATION_DEGREE", Kind::Integer),
];

/// OEM field directory, tables 5-2 and 5-3.
pub static SCHEMA: &[Field] = &[
    Field::group(HEADER, OEM_HEADER),
    Field::group(METADATA, OEM_METADATA),
];

/// A decoded Orbit Ephemeris Message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Oem {
    pub header: Header,
    pub metadata: Metadata,
    pub data: Data,
    /// Trimmed source text of the message
    pub raw: String,
}

impl Oem {
    /// Decode `text` using the default [Decoder].
    ///
    /// # Errors
    /// See [crate::Error].
    pub fn decode(text: &str) -> Result<Self> {
        Decoder::default().decode(text)
    }
}

impl Message for Oem {
    const NAME: &'static str = "OEM";

    fn schema() -> &'static [Field] {
        SCHEMA
    }

    fn from_parts(
        mut record: Record,
        extensions: Extensions,
        raw: String,
        _decoder: &Decoder,
    ) -> Result<Self> {
        if !extensions.is_empty() {
            debug!(
                count = extensions.len(),
                "OEM does not support user defined parameters; ignoring"
            );
        }
        Ok(Self {
            header: Header::from_record(record.record(HEADER), VERSION_KEY),
            metadata: Metadata::from_record(record.record(METADATA)),
            data: Data::default(),
            raw,
        })
    }
}

/// OEM metadata, table 5-3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub comments: Vec<String>,
    pub object_name: String,
    pub object_id: String,
    pub center_name: String,
    pub ref_frame: String,
    pub ref_frame_epoch: Option<DateTime<Utc>>,
    pub time_system: String,
    pub start_time: DateTime<Utc>,
    pub useable_start_time: Option<DateTime<Utc>>,
    pub useable_stop_time: Option<DateTime<Utc>>,
    pub stop_time: DateTime<Utc>,
    /// Recommended interpolation method, e.g., `HERMITE`
    pub interpolation: Option<String>,
    pub interpolation_degree: Option<u64>,
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
            start_time: rec.epoch("START_TIME").unwrap_or_default(),
            useable_start_time: rec.epoch("USEABLE_START_TIME"),
            useable_stop_time: rec.epoch("USEABLE_STOP_TIME"),
            stop_time: rec.epoch("STOP_TIME").unwrap_or_default(),
            interpolation: rec.text("INTERPOLATION"),
            interpolation_degree: rec.integer("INTERPOLATION_DEGREE"),
        }
    }
}

/// Placeholder for the ephemeris data lines, which are not decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {}

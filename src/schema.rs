//! Declarative field directories describing the layout of each message type.
//!
//! A directory is a static, preorder list of [Field]s. The order of the keys in a directory is
//! the only key order accepted for a message. Sections shared by more than one message type
//! are defined here.
use crate::kvn::COMMENT;

/// The kind of value a [Field] decodes.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Text,
    Real,
    /// Unsigned integer
    Integer,
    Epoch,
    /// Run of consecutive tokens with the same key, i.e., comments
    Comments,
    /// Nested section. Entering a group does not consume a token.
    Group(&'static [Field]),
    /// Zero or more repetitions of a template section. Repetition ends the first time the
    /// leading key of the template is not next.
    List(&'static [Field]),
}

/// Description of a single decodable slot in a message.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// KVN key this field matches. For groups and lists this is only a label.
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl Field {
    #[must_use]
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    #[must_use]
    pub const fn comments() -> Self {
        Self::optional(COMMENT, Kind::Comments)
    }

    #[must_use]
    pub const fn group(name: &'static str, fields: &'static [Field]) -> Self {
        Self::optional(name, Kind::Group(fields))
    }

    #[must_use]
    pub const fn list(name: &'static str, template: &'static [Field]) -> Self {
        Self::optional(name, Kind::List(template))
    }

    /// True for fields that match a single token.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.kind,
            Kind::Text | Kind::Real | Kind::Integer | Kind::Epoch
        )
    }
}

/// All KVN keys of `fields` in document order, including keys of nested groups and list
/// templates.
#[must_use]
pub fn keys(fields: &[Field]) -> Vec<&'static str> {
    let mut keys = Vec::new();
    for field in fields {
        match field.kind {
            Kind::Group(children) | Kind::List(children) => keys.extend(self::keys(children)),
            _ => keys.push(field.name),
        }
    }
    keys
}

// Group labels
pub const HEADER: &str = "HEADER";
pub const METADATA: &str = "METADATA";
pub const DATA: &str = "DATA";
pub const SPACECRAFT_PARAMETERS: &str = "SPACECRAFT_PARAMETERS";
pub const COVARIANCE_MATRIX: &str = "COVARIANCE_MATRIX";

/// Header shared by all ODM messages, with the given version key.
macro_rules! header {
    ($version:expr) => {
        &[
            $crate::schema::Field::required($version, $crate::schema::Kind::Text),
            $crate::schema::Field::comments(),
            $crate::schema::Field::optional("CLASSIFICATION", $crate::schema::Kind::Text),
            $crate::schema::Field::required("CREATION_DATE", $crate::schema::Kind::Epoch),
            $crate::schema::Field::required("ORIGINATOR", $crate::schema::Kind::Text),
            $crate::schema::Field::optional("MESSAGE_ID", $crate::schema::Kind::Text),
        ]
    };
}
pub(crate) use header;

/// Spacecraft parameters, OPM table 3-3 and OMM table 4-3.
pub const SPACECRAFT: &[Field] = &[
    Field::comments(),
    Field::optional("MASS", Kind::Real),
    Field::optional("SOLAR_RAD_AREA", Kind::Real),
    Field::optional("SOLAR_RAD_COEFF", Kind::Real),
    Field::optional("DRAG_AREA", Kind::Real),
    Field::optional("DRAG_COEFF", Kind::Real),
];

/// Lower triangle of the 6x6 position/velocity covariance, in document order.
pub const COVARIANCE_TERMS: [&str; 21] = [
    "CX_X",
    "CY_X",
    "CY_Y",
    "CZ_X",
    "CZ_Y",
    "CZ_Z",
    "CX_DOT_X",
    "CX_DOT_Y",
    "CX_DOT_Z",
    "CX_DOT_X_DOT",
    "CY_DOT_X",
    "CY_DOT_Y",
    "CY_DOT_Z",
    "CY_DOT_X_DOT",
    "CY_DOT_Y_DOT",
    "CZ_DOT_X",
    "CZ_DOT_Y",
    "CZ_DOT_Z",
    "CZ_DOT_X_DOT",
    "CZ_DOT_Y_DOT",
    "CZ_DOT_Z_DOT",
];

const fn covariance_fields() -> [Field; 23] {
    let mut fields = [Field::comments(); 23];
    fields[1] = Field::optional("COV_REF_FRAME", Kind::Text);
    let mut idx = 0;
    while idx < COVARIANCE_TERMS.len() {
        fields[idx + 2] = Field::optional(COVARIANCE_TERMS[idx], Kind::Real);
        idx += 1;
    }
    fields
}

/// Position/velocity covariance matrix, OPM table 3-3 and OMM table 4-3.
pub const COVARIANCE: &[Field] = &covariance_fields();

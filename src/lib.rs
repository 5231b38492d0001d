#![doc = include_str!("../README.md")]

mod decoder;
mod error;

pub mod common;
pub mod decode;
pub mod epoch;
pub mod kvn;
pub mod oem;
pub mod omm;
pub mod opm;
pub mod schema;
pub mod validate;

pub use decoder::{Decoder, Message};
pub use error::{Error, Result};

pub(crate) mod prelude {
    pub(crate) use crate::error::{Error, Result};
    pub(crate) use tracing::{debug, trace, warn};
}

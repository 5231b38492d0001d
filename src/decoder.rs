use rayon::prelude::*;
use tracing::{span, Level};
use typed_builder::TypedBuilder;

use crate::decode::{self, Extensions, Record};
use crate::kvn;
use crate::prelude::*;
use crate::schema::Field;

/// A message type that can be decoded from KVN.
pub trait Message: Sized {
    /// Short message type name, e.g., `OPM`
    const NAME: &'static str;

    /// Field directory for the message.
    fn schema() -> &'static [Field];

    /// Construct the message from its decoded fields, applying any post-decode rules.
    ///
    /// # Errors
    /// If a post-decode rule fails.
    fn from_parts(
        record: Record,
        extensions: Extensions,
        raw: String,
        decoder: &Decoder,
    ) -> Result<Self>;
}

/// Decodes KVN text into [Message]s.
///
/// # Examples
/// Decode using the defaults.
/// ```
/// use odm::{Decoder, omm::Omm};
///
/// let text = "\
/// CCSDS_OMM_VERS = 3.0
/// CREATION_DATE = 2020-065T16:00:00
/// ORIGINATOR = NOAA
/// OBJECT_NAME = GOES 9
/// OBJECT_ID = 1995-025A
/// CENTER_NAME = EARTH
/// REF_FRAME = TEME
/// TIME_SYSTEM = UTC
/// EPOCH = 2020-064T10:34:41.4264
/// ECCENTRICITY = 0.0005013
/// INCLINATION = 3.0539 [deg]
/// RA_OF_ASC_NODE = 81.7939 [deg]
/// ARG_OF_PERICENTER = 249.2363 [deg]
/// MEAN_ANOMALY = 150.1602 [deg]";
///
/// let omm: Omm = Decoder::default().decode(text).unwrap();
/// assert_eq!(omm.metadata.object_name, "GOES 9");
/// ```
/// Reject keys remaining after the last field of the message.
/// ```
/// use odm::{Decoder, Error, omm::Omm};
/// # let text = "\
/// # CCSDS_OMM_VERS = 3.0
/// # CREATION_DATE = 2020-065T16:00:00
/// # ORIGINATOR = NOAA
/// # OBJECT_NAME = GOES 9
/// # OBJECT_ID = 1995-025A
/// # CENTER_NAME = EARTH
/// # REF_FRAME = TEME
/// # TIME_SYSTEM = UTC
/// # EPOCH = 2020-064T10:34:41.4264
/// # ECCENTRICITY = 0.0005013
/// # INCLINATION = 3.0539
/// # RA_OF_ASC_NODE = 81.7939
/// # ARG_OF_PERICENTER = 249.2363
/// # MEAN_ANOMALY = 150.1602";
/// let text = format!("{text}\nNOT_A_KEY = 1");
///
/// let zult = Decoder::builder().strict(true).build().decode::<Omm>(&text);
/// assert!(matches!(zult, Err(Error::UnexpectedKey { .. })));
/// ```
#[derive(TypedBuilder, Debug, Clone)]
pub struct Decoder {
    /// When true, keys left over after all fields have been decoded are an error. Otherwise
    /// they are logged and ignored.
    #[builder(default)]
    strict: bool,
    /// Move comments decoded into an empty OPM covariance section to the first maneuver,
    /// where they belong.
    #[builder(default = true)]
    relocate_comments: bool,
    /// Number of threads used by [Decoder::decode_many]. Zero uses the global rayon pool.
    #[builder(default)]
    num_threads: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Decoder {
    #[must_use]
    pub fn strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub fn relocate_comments(&self) -> bool {
        self.relocate_comments
    }

    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Decode a single message from `text`.
    ///
    /// # Errors
    /// The first error encountered. No partial message is produced.
    pub fn decode<M: Message>(&self, text: &str) -> Result<M> {
        let span = span!(Level::DEBUG, "decode", kind = M::NAME);
        let _guard = span.enter();

        let tokens = kvn::tokenize(text)?;
        let decoded = decode::decode(M::schema(), &tokens)?;

        if let Some(token) = decoded.unconsumed.first() {
            if self.strict {
                return Err(Error::UnexpectedKey {
                    key: token.key.clone(),
                    line: token.line,
                });
            }
            warn!(
                count = decoded.unconsumed.len(),
                key = %token.key,
                line = token.line,
                "ignoring keys after end of message"
            );
        }

        M::from_parts(
            decoded.record,
            decoded.extensions,
            text.trim().to_string(),
            self,
        )
    }

    /// Decode many independent messages in parallel.
    ///
    /// Results are in the same order as `texts`.
    pub fn decode_many<M, S>(&self, texts: &[S]) -> Vec<Result<M>>
    where
        M: Message + Send,
        S: AsRef<str> + Sync,
    {
        let decode = || -> Vec<Result<M>> {
            texts
                .par_iter()
                .map(|text| self.decode(text.as_ref()))
                .collect()
        };
        if self.num_threads == 0 {
            return decode();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
        {
            Ok(pool) => pool.install(decode),
            Err(err) => {
                warn!("failed to construct decode threadpool, using global pool: {err}");
                decode()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::opm::Opm;

    const OPM: &str = "CCSDS_OPM_VERS = 3.0
CREATION_DATE = 2022-11-06T09:23:57
ORIGINATOR = JAXA
OBJECT_NAME = OSPREY 5
OBJECT_ID = 1998-999A
CENTER_NAME = EARTH
REF_FRAME = ITRF2000
TIME_SYSTEM = UTC
EPOCH = 2022-12-18T14:28:15.1172
X = 6503.514000
Y = 1239.647000
Z = -717.490000
X_DOT = -0.873160
Y_DOT = 8.740420
Z_DOT = -4.191076";

    #[test]
    fn defaults() {
        let decoder = Decoder::default();
        assert!(!decoder.strict());
        assert!(decoder.relocate_comments());
        assert_eq!(decoder.num_threads(), 0);
    }

    #[test]
    fn lenient_ignores_trailing_keys() {
        let text = format!("{OPM}\nBOGUS = 1\nOTHER = 2");
        let opm: Opm = Decoder::default().decode(&text).unwrap();
        assert_eq!(opm.data.state_vector.x, 6503.514);
    }

    #[test]
    fn strict_rejects_trailing_keys() {
        let text = format!("{OPM}\nBOGUS = 1");
        let zult = Decoder::builder().strict(true).build().decode::<Opm>(&text);
        match zult {
            Err(Error::UnexpectedKey { key, line }) => {
                assert_eq!(key, "BOGUS");
                assert_eq!(line, 16);
            }
            other => panic!("expected UnexpectedKey, got {other:?}"),
        }
    }

    #[test]
    fn strict_accepts_complete_message() {
        let zult = Decoder::builder().strict(true).build().decode::<Opm>(OPM);
        assert!(zult.is_ok(), "got {zult:?}");
    }

    #[test]
    fn raw_is_trimmed_source() {
        let text = format!("\n\n{OPM}\n\n");
        let opm: Opm = Decoder::default().decode(&text).unwrap();
        assert_eq!(opm.raw, OPM);
    }

    #[test]
    fn decode_many_keeps_order() {
        let bad = OPM.replace("ORIGINATOR", "ORIG");
        let other = OPM.replace("OSPREY 5", "OSPREY 6");
        let texts = vec![OPM.to_string(), bad, other];

        let zults: Vec<Result<Opm>> = Decoder::default().decode_many(&texts);

        assert_eq!(zults.len(), 3);
        assert_eq!(zults[0].as_ref().unwrap().metadata.object_name, "OSPREY 5");
        assert!(matches!(
            zults[1],
            Err(Error::KeyMismatch {
                expected: "ORIGINATOR",
                ..
            })
        ));
        assert_eq!(zults[2].as_ref().unwrap().metadata.object_name, "OSPREY 6");
    }

    #[test]
    fn decode_many_with_dedicated_pool() {
        let texts = vec![OPM; 8];
        let zults: Vec<Result<Opm>> = Decoder::builder()
            .num_threads(2)
            .build()
            .decode_many(&texts);

        assert_eq!(zults.len(), 8);
        assert!(zults.iter().all(Result::is_ok));
    }
}

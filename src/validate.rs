//! Rules applied after decoding that involve more than one field.
use crate::common::CovarianceMatrix;
use crate::opm::{KeplerianElements, Maneuver};
use crate::prelude::*;

/// Osculating elements may provide the true anomaly or the mean anomaly, but not both. A
/// value of zero counts as not provided.
///
/// # Errors
/// [Error::AmbiguousAnomaly] if both are non-zero.
pub fn check_anomalies(elements: &KeplerianElements) -> Result<()> {
    let non_zero = |value: Option<f64>| matches!(value, Some(v) if v != 0.0);
    if non_zero(elements.true_anomaly) && non_zero(elements.mean_anomaly) {
        return Err(Error::AmbiguousAnomaly);
    }
    Ok(())
}

/// Move comments captured by an otherwise empty covariance section to the first maneuver.
///
/// The covariance section comes directly before the maneuvers and all of its keys are
/// optional, so comments leading the first maneuver are decoded as covariance comments when
/// there is no covariance. Only applies when the covariance has no `COV_REF_FRAME` and there is
/// at least one maneuver.
///
/// Returns true if comments were moved.
pub fn relocate_covariance_comments(
    covariance: &mut CovarianceMatrix,
    maneuvers: &mut [Maneuver],
) -> bool {
    if covariance.comments.is_empty() || covariance.cov_ref_frame.is_some() {
        return false;
    }
    let Some(first) = maneuvers.first_mut() else {
        return false;
    };

    debug!(
        count = covariance.comments.len(),
        "moving covariance comments to first maneuver"
    );
    let mut comments = std::mem::take(&mut covariance.comments);
    comments.append(&mut first.comments);
    first.comments = comments;
    true
}

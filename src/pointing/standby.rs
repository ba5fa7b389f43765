//! Outcome of one standby supervision cycle.

use crate::error::ErrorStatus;

/// Fold the elevation and azimuth checks of a standby cycle into one status.
///
/// Two errors are joined, elevation first. A single error is returned on
/// its own. Otherwise the elevation check's status is returned, so an
/// azimuth WARNING is not reported when elevation is clean.
pub fn aggregate(elevation: ErrorStatus, azimuth: ErrorStatus) -> ErrorStatus {
    match (elevation.is_error(), azimuth.is_error()) {
        (true, true) => ErrorStatus::concat(&elevation, &azimuth),
        (false, true) => azimuth,
        _ => elevation,
    }
}

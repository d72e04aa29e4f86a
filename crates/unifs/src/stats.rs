//! Translation of raw driver metadata into [`Stats`].

use crate::driver::{DriverError, DriverResult, RawInfo};
use crate::types::{PatchableFields, Stats};

/// Stat fields this adapter can patch. Metadata only changes with content.
pub const PATCHABLE_FIELDS: PatchableFields = PatchableFields::NONE;

/// Convert raw driver info for `address` into canonical stats.
///
/// A missing address becomes a `NotFound` driver error, so the caller
/// classifies it like any other stat failure.
pub fn translate_stats(address: &str, info: RawInfo) -> DriverResult<Stats> {
    if !info.exists {
        return Err(DriverError::not_found(address));
    }

    Ok(Stats {
        size: if info.is_directory { None } else { info.size },
        modified: info.modified,
        etag: info.hash,
    })
}

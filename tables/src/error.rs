//! Errors reported by table growth.
use std::fmt;

/// `CapacityError` indicates that growing a table would reach its size limit.
///
/// The limit defaults to [`MAX_TABLE_SIZE`](dynhash_inthash::MAX_TABLE_SIZE) entries per slot
/// array or directory. A table that returns this error still holds exactly the keys it held before
/// the failed insert. Inserting keys that collide in the same way will fail again, so callers
/// usually treat this as fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityError {
    /// The number of entries the failed growth step asked for.
    pub requested: usize,
    /// The limit that every slot array or directory has to stay below.
    pub limit: usize,
}

impl CapacityError {
    /// Returns `Ok(())` when an array or directory of `requested` entries stays below `limit`.
    pub(crate) fn check(requested: usize, limit: usize) -> Result<(), CapacityError> {
        if requested < limit {
            Ok(())
        } else {
            Err(CapacityError { requested, limit })
        }
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table has grown too large: {} entries requested, limit is {}",
            self.requested, self.limit
        )
    }
}

impl std::error::Error for CapacityError {}

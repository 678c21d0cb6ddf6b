//! IFD chain traversal.
//!
//! Directories form a singly linked list through their next-IFD fields.
//! The walk follows it until a zero offset, refusing to visit any offset
//! twice. Chains have no length cap besides that, so callers wanting a hard
//! bound wrap the source (see [`BudgetedReader`](crate::io::BudgetedReader)).

use std::collections::HashSet;
use std::io::{Read, Seek};

use tracing::debug;

use crate::error::TiffError;
use crate::io::TiffSource;

use super::directory::Directory;
use super::parser::TiffHeader;

/// Decode every directory reachable from the header's first IFD offset.
///
/// The visited-offset set lives only for this call. On failure nothing
/// decoded so far escapes.
///
/// # Errors
/// `BadData` on a cycle, an offset that does not fit a signed 64-bit file
/// position, or any directory decode failure.
pub(crate) fn walk_chain<R: Read + Seek>(
    source: &mut TiffSource<R>,
    header: &TiffHeader,
) -> Result<Vec<Directory>, TiffError> {
    let mut visited = HashSet::new();
    let mut directories = Vec::new();
    let mut offset = header.first_ifd_offset;

    while offset != 0 {
        if offset > i64::MAX as u64 {
            return Err(TiffError::bad_data(format!(
                "Bad directory offset {offset}"
            )));
        }

        // Recorded before decoding so a self-referencing directory is caught
        if !visited.insert(offset) {
            return Err(TiffError::bad_data(format!(
                "Loop detected: directory offset {offset} visited twice"
            )));
        }

        let directory = Directory::read(source, header, offset)?;
        debug!(
            index = directories.len(),
            offset,
            entries = directory.len(),
            next = directory.next_offset(),
            "decoded directory"
        );

        offset = directory.next_offset();
        directories.push(directory);
    }

    Ok(directories)
}

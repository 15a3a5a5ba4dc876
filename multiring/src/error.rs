//! Error types for structural operations.

use core::fmt;

/// Reasons [`DataKey::attach_subring`](crate::DataKey::attach_subring)
/// refuses to attach a head.
///
/// Checked before anything is written, so a failed attach leaves the
/// structure exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachError {
    /// The data node already has a subring.
    DataNodeAlreadyHasSubring,
    /// The head is already attached below some data node.
    HeadNodeAlreadyHasSuperring,
    /// The head encloses the data node; attaching would nest the structure
    /// inside itself.
    UnsafeLoopCreation,
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AttachError::DataNodeAlreadyHasSubring => "data node already has a subring",
            AttachError::HeadNodeAlreadyHasSuperring => "head node already has a superring",
            AttachError::UnsafeLoopCreation => "attaching would create a loop",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for AttachError {}

//! Capability descriptors.
//!
//! Optional operations are declared as data so generic code can ask an
//! adapter what it supports without calling it.

use serde::Serialize;

use crate::stats::PATCHABLE_FIELDS;
use crate::types::PatchableFields;

/// Optional operations an adapter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub support_directory: bool,
    pub support_append: bool,
    pub support_range_read: bool,
    pub support_range_write: bool,
    pub patchable: PatchableFields,
}

impl Capabilities {
    pub fn can_patch_accessed(&self) -> bool {
        self.patchable.accessed
    }

    pub fn can_patch_created(&self) -> bool {
        self.patchable.created
    }

    pub fn can_patch_modified(&self) -> bool {
        self.patchable.modified
    }

    /// Returns true if any metadata field can be patched.
    pub fn can_patch(&self) -> bool {
        self.patchable.any()
    }
}

/// Types that carry a static capability descriptor.
pub trait HasCapabilities {
    const CAPABILITIES: Capabilities;

    fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }
}

/// Capabilities of the driver-backed adapters.
///
/// Append and range write are declared, but writes currently replace the
/// whole file.
pub const ADAPTER_CAPABILITIES: Capabilities = Capabilities {
    support_directory: true,
    support_append: true,
    support_range_read: true,
    support_range_write: true,
    patchable: PATCHABLE_FIELDS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_capabilities() {
        let caps = ADAPTER_CAPABILITIES;
        assert!(caps.support_directory);
        assert!(caps.support_append);
        assert!(caps.support_range_read);
        assert!(caps.support_range_write);
        assert!(!caps.can_patch_accessed());
        assert!(!caps.can_patch_created());
        assert!(!caps.can_patch_modified());
        assert!(!caps.can_patch());
    }
}

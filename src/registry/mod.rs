//! Lookups against the Research Organization Registry (ROR).
//!
//! The pipeline needs two things from ROR: the display name of an
//! organization, and ROR's own table of organization relations.

mod download;
mod ror;

pub use download::{unpack_dump, DumpSource};
pub use ror::RorDump;

use crate::error::RegistryResult;
use crate::vocabulary::RelationTerm;

/// Namespace used for targets that are themselves ROR records.
pub const ROR_NS: &str = "ror";

/// One relation row as declared by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRelation {
    pub source_id: String,
    pub relation_ns: String,
    pub relation_id: String,
    pub target_ns: String,
    pub target_id: String,
}

impl RegistryRelation {
    pub fn term(&self) -> RelationTerm {
        RelationTerm::new(self.relation_ns.as_str(), self.relation_id.as_str())
    }

    /// Whether the target is another ROR record.
    pub fn targets_registry(&self) -> bool {
        self.target_ns == ROR_NS
    }
}

/// Read access to the registry.
pub trait Registry {
    /// Display name of a ROR id, or `None` if the id is unknown.
    fn name(&self, id: &str) -> Option<String>;

    /// The registry's full internal relation table.
    fn relations(&self) -> RegistryResult<Vec<RegistryRelation>>;
}

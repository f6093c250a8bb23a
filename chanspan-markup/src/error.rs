use thiserror::Error;

use crate::post::ArchiveDescriptor;

/// Rule registry misconfiguration.
///
/// These are setup defects, never the fault of a single post, so they are
/// returned to the caller instead of degrading the output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
  #[error("Rule set for archive {0} has already been registered")]
  Duplicate(ArchiveDescriptor),

  #[error("No rule set registered for archive {0}")]
  Unregistered(ArchiveDescriptor),
}

//! Rule set lookup keyed by archive.
use std::{
  collections::HashMap,
  sync::{Arc, PoisonError, RwLock},
};

use crate::{error::RegistryError, post::ArchiveDescriptor, rules::RuleSet};

/// Maps archives to the rule sets that understand their markup.
///
/// Posts without an archive use the default rule set. Registration and lookup
/// may happen from any thread; readers only block while a registration is in
/// progress.
pub struct RuleRegistry {
  default:  Arc<dyn RuleSet>,
  archives: RwLock<HashMap<ArchiveDescriptor, Arc<dyn RuleSet>>>,
}

impl RuleRegistry {
  #[must_use]
  pub fn new(default: Arc<dyn RuleSet>) -> Self {
    Self {
      default,
      archives: RwLock::new(HashMap::new()),
    }
  }

  /// Register the rule set for `archive`.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::Duplicate`] if the archive already has rules;
  /// the existing entry is kept.
  pub fn register(
    &self,
    archive: ArchiveDescriptor,
    rules: Arc<dyn RuleSet>,
  ) -> Result<(), RegistryError> {
    let mut archives =
      self.archives.write().unwrap_or_else(PoisonError::into_inner);

    if archives.contains_key(&archive) {
      return Err(RegistryError::Duplicate(archive));
    }

    log::debug!("Registered rule set for archive {archive}");
    archives.insert(archive, rules);
    Ok(())
  }

  /// The rule set for `archive`, or the default one when there is none.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::Unregistered`] if an archive is given but has no
  /// registered rules.
  pub fn resolve(
    &self,
    archive: Option<&ArchiveDescriptor>,
  ) -> Result<Arc<dyn RuleSet>, RegistryError> {
    let Some(archive) = archive else {
      return Ok(Arc::clone(&self.default));
    };

    self
      .archives
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .get(archive)
      .map(Arc::clone)
      .ok_or_else(|| RegistryError::Unregistered(archive.clone()))
  }

  #[must_use]
  pub fn contains(&self, archive: &ArchiveDescriptor) -> bool {
    self
      .archives
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .contains_key(archive)
  }

  /// Number of registered archives, not counting the default.
  #[must_use]
  pub fn len(&self) -> usize {
    self
      .archives
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl std::fmt::Debug for RuleRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RuleRegistry")
      .field("archives", &self.len())
      .finish_non_exhaustive()
  }
}

use crate::args::Args;
use crate::context::ConstructionGuard;
use crate::instance::Instance;
use crate::registration::Provider;
use crate::resolver::Resolver;
use crate::scope::Scope;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Caches one instance per registration until [`reset`](Self::reset).
///
/// Each cache key owns a `OnceCell`, so concurrent first resolutions of the
/// same key construct at most one instance; the others wait for it. The map
/// itself is only locked long enough to fetch or insert the cell, which keeps
/// nested resolutions of other keys from contending. A factory that returns
/// nothing leaves the cell empty and the next resolution tries again.
///
/// Resolving a key from inside its own factory, directly or through other
/// services, is a dependency cycle and panics.
#[derive(Default)]
pub struct ScopeCached {
  cells: DashMap<String, Arc<OnceCell<Instance>>>,
}

impl ScopeCached {
  pub fn new() -> Self {
    Self::default()
  }

  /// Drops every cached instance. In-flight constructions finish into cells
  /// that are no longer reachable.
  pub fn reset(&self) {
    tracing::debug!(entries = self.cells.len(), "resetting cached scope");
    self.cells.clear();
  }

  pub fn len(&self) -> usize {
    self.cells.iter().filter(|cell| cell.value().get().is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Scope for ScopeCached {
  fn resolve(&self, resolver: &Resolver, provider: &dyn Provider, args: &Args) -> Option<Instance> {
    let cell = self
      .cells
      .entry(provider.cache_key().to_owned())
      .or_default()
      .clone();

    if let Some(instance) = cell.get() {
      tracing::trace!(service = %provider.key(), "cache hit");
      return Some(instance.clone());
    }

    // Re-entering the key from its own factory would wait on this cell forever.
    let _constructing = ConstructionGuard::enter(provider.cache_key(), provider.key());
    cell
      .get_or_try_init(|| {
        tracing::trace!(service = %provider.key(), "cache miss, constructing");
        provider.produce(resolver, args).ok_or(())
      })
      .ok()
      .cloned()
  }
}

impl fmt::Debug for ScopeCached {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ScopeCached")
      .field("entries", &self.len())
      .finish()
  }
}

use crate::args::Args;
use crate::instance::{Instance, WeakInstance};
use crate::registration::Provider;
use crate::resolver::Resolver;
use crate::scope::Scope;
use dashmap::DashMap;
use std::fmt;

/// Caches a weak reference per registration.
///
/// Resolutions keep returning the same instance while some owner outside the
/// resolver holds it. Once the last owner drops it the next resolution builds
/// a new one.
///
/// Construction happens outside the map lock: concurrent misses for the same
/// key may each build an instance, and the last one written keeps the slot.
#[derive(Default)]
pub struct ScopeShared {
  cache: DashMap<String, WeakInstance>,
}

impl ScopeShared {
  pub fn new() -> Self {
    Self::default()
  }

  /// Removes entries whose instances have been dropped.
  pub fn purge(&self) {
    self.cache.retain(|_, weak| weak.is_alive());
  }

  /// Number of entries, including those whose instances have been dropped.
  pub fn len(&self) -> usize {
    self.cache.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cache.is_empty()
  }

  /// Number of entries whose instances are still alive.
  pub fn live(&self) -> usize {
    self.cache.iter().filter(|entry| entry.value().is_alive()).count()
  }
}

impl Scope for ScopeShared {
  fn resolve(&self, resolver: &Resolver, provider: &dyn Provider, args: &Args) -> Option<Instance> {
    let cached = self
      .cache
      .get(provider.cache_key())
      .and_then(|weak| weak.upgrade());
    if let Some(instance) = cached {
      tracing::trace!(service = %provider.key(), "shared instance still alive");
      return Some(instance);
    }

    let instance = provider.produce(resolver, args)?;
    self
      .cache
      .insert(provider.cache_key().to_owned(), instance.downgrade());
    Some(instance)
  }
}

impl fmt::Debug for ScopeShared {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ScopeShared")
      .field("entries", &self.cache.len())
      .finish()
  }
}

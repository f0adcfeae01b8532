use crate::args::Args;
use crate::instance::Instance;
use crate::registration::Provider;
use crate::resolver::Resolver;
use crate::scope::{Scope, ScopeCached};

/// Caches one instance per registration for the life of the process.
///
/// Behaves like [`ScopeCached`] except that it cannot be reset from outside;
/// only [`Resolver::reset`] clears it.
#[derive(Debug, Default)]
pub struct ScopeApplication {
  cache: ScopeCached,
}

impl ScopeApplication {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn reset(&self) {
    self.cache.reset();
  }
}

impl Scope for ScopeApplication {
  fn resolve(&self, resolver: &Resolver, provider: &dyn Provider, args: &Args) -> Option<Instance> {
    self.cache.resolve(resolver, provider, args)
  }
}

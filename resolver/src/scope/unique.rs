use crate::args::Args;
use crate::instance::Instance;
use crate::registration::Provider;
use crate::resolver::Resolver;
use crate::scope::Scope;

/// Never caches; every resolution runs the factory.
#[derive(Debug, Default)]
pub struct ScopeUnique;

impl Scope for ScopeUnique {
  fn resolve(&self, resolver: &Resolver, provider: &dyn Provider, args: &Args) -> Option<Instance> {
    provider.produce(resolver, args)
  }
}

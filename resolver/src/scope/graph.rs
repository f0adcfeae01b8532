use crate::args::Args;
use crate::context::{self, ResolutionFrame};
use crate::instance::Instance;
use crate::registration::Provider;
use crate::resolver::Resolver;
use crate::scope::Scope;

/// Caches an instance for the duration of one resolution call tree.
///
/// Within a single top-level resolution, every graph-scoped registration is
/// built at most once, so diamond-shaped dependencies share one instance. The
/// cache is emptied when the outermost resolution on the thread returns.
///
/// Call trees are tracked per thread; resolutions running on other threads,
/// including threads spawned from inside a factory, start their own tree.
#[derive(Debug, Default)]
pub struct ScopeGraph;

impl Scope for ScopeGraph {
  fn resolve(&self, resolver: &Resolver, provider: &dyn Provider, args: &Args) -> Option<Instance> {
    // Our own frame, so direct calls outside a resolver still clear on return.
    let _frame = ResolutionFrame::enter();

    if let Some(instance) = context::graph_get(provider.cache_key()) {
      tracing::trace!(service = %provider.key(), "graph hit");
      return Some(instance);
    }

    let instance = provider.produce(resolver, args)?;
    context::graph_insert(provider.cache_key(), instance.clone());
    Some(instance)
  }
}

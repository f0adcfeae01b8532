//! Caching policies applied when a registration is resolved.
//!
//! Every registration carries a scope. On resolution the scope either hands
//! back an instance it already holds or asks the registration to produce a new
//! one, deciding whether and how long to keep it.
//!
//! The built-in scopes are process-wide instances returned by [`unique`],
//! [`application`], [`cached`], [`shared`] and [`graph`]. Additional
//! [`ScopeCached`] instances can be created for caches that need to be reset
//! independently.

pub mod application;
pub mod cached;
pub mod graph;
pub mod shared;
pub mod unique;

pub use application::ScopeApplication;
pub use cached::ScopeCached;
pub use graph::ScopeGraph;
pub use shared::ScopeShared;
pub use unique::ScopeUnique;

use crate::args::Args;
use crate::instance::Instance;
use crate::registration::Provider;
use crate::resolver::Resolver;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// A trait for implementing instance caching policies.
pub trait Scope: Send + Sync {
  /// Returns a cached instance for `provider`, or produces one and applies
  /// the policy to it. `None` when the provider's factory declines.
  fn resolve(&self, resolver: &Resolver, provider: &dyn Provider, args: &Args) -> Option<Instance>;
}

static UNIQUE: Lazy<Arc<ScopeUnique>> = Lazy::new(|| Arc::new(ScopeUnique));
static APPLICATION: Lazy<Arc<ScopeApplication>> = Lazy::new(|| Arc::new(ScopeApplication::new()));
static CACHED: Lazy<Arc<ScopeCached>> = Lazy::new(|| Arc::new(ScopeCached::new()));
static SHARED: Lazy<Arc<ScopeShared>> = Lazy::new(|| Arc::new(ScopeShared::new()));
static GRAPH: Lazy<Arc<ScopeGraph>> = Lazy::new(|| Arc::new(ScopeGraph));

/// A new instance on every resolution.
pub fn unique() -> Arc<ScopeUnique> {
  UNIQUE.clone()
}

/// One instance for the life of the process. The default scope.
pub fn application() -> Arc<ScopeApplication> {
  APPLICATION.clone()
}

/// One instance until [`ScopeCached::reset`] is called.
pub fn cached() -> Arc<ScopeCached> {
  CACHED.clone()
}

/// One instance for as long as something outside the resolver holds it.
pub fn shared() -> Arc<ScopeShared> {
  SHARED.clone()
}

/// One instance per resolution call tree.
pub fn graph() -> Arc<ScopeGraph> {
  GRAPH.clone()
}

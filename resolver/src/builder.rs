use crate::resolver::Resolver;
use crate::scope::{self, Scope};
use std::fmt;
use std::sync::Arc;

/// A builder for configuring a [`Resolver`].
///
/// ```
/// use fibre_resolver::{scope, Resolver};
/// use std::sync::Arc;
///
/// let base = Arc::new(Resolver::new());
/// let child = Resolver::builder()
///   .parent(base.clone())
///   .default_scope(scope::unique())
///   .build();
/// assert!(child.parent().is_some());
/// ```
#[derive(Default)]
pub struct ResolverBuilder {
  parent: Option<Arc<Resolver>>,
  default_scope: Option<Arc<dyn Scope>>,
}

impl ResolverBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Lookups that miss in the built resolver continue in `parent`.
  pub fn parent(mut self, parent: Arc<Resolver>) -> Self {
    self.parent = Some(parent);
    self
  }

  /// Scope for new registrations. Defaults to the parent's default scope,
  /// or the application scope when there is no parent.
  pub fn default_scope(mut self, scope: Arc<dyn Scope>) -> Self {
    self.default_scope = Some(scope);
    self
  }

  pub fn build(self) -> Resolver {
    let default_scope: Arc<dyn Scope> = match (self.default_scope, &self.parent) {
      (Some(scope), _) => scope,
      (None, Some(parent)) => parent.default_scope(),
      (None, None) => scope::application(),
    };
    Resolver::from_parts(self.parent, default_scope)
  }
}

impl fmt::Debug for ResolverBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResolverBuilder")
      .field("has_parent", &self.parent.is_some())
      .field("has_default_scope", &self.default_scope.is_some())
      .finish()
  }
}

//! The `Resolver` struct and its registration and resolution methods.

use crate::args::Args;
use crate::builder::ResolverBuilder;
use crate::context::ResolutionFrame;
use crate::error::ResolveError;
use crate::global;
use crate::key::ServiceKey;
use crate::registration::{Registration, RegistrationHandle};
use crate::scope::{self, Scope};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type ErasedRegistration = Arc<dyn Any + Send + Sync>;

/// A registry of service factories and the entry point for resolving them.
///
/// Registrations are keyed by service type and an optional name. Registering
/// the same key twice replaces the earlier registration. A resolver may have a
/// parent; lookups that miss locally continue up the parent chain.
///
/// All methods take `&self`, so a resolver can be shared across threads and
/// registrations can be added at any time.
pub struct Resolver {
  registrations: DashMap<ServiceKey, ErasedRegistration>,
  parent: Option<Arc<Resolver>>,
  default_scope: RwLock<Arc<dyn Scope>>,
}

impl Default for Resolver {
  fn default() -> Self {
    Self::new()
  }
}

impl Resolver {
  /// Creates an empty resolver using the application scope by default.
  pub fn new() -> Self {
    Self::from_parts(None, scope::application())
  }

  /// Creates an empty child resolver that falls back to `parent` on lookup
  /// misses and inherits its default scope.
  pub fn with_parent(parent: Arc<Resolver>) -> Self {
    let default_scope = parent.default_scope();
    Self::from_parts(Some(parent), default_scope)
  }

  pub fn builder() -> ResolverBuilder {
    ResolverBuilder::new()
  }

  pub(crate) fn from_parts(parent: Option<Arc<Resolver>>, default_scope: Arc<dyn Scope>) -> Self {
    Self {
      registrations: DashMap::new(),
      parent,
      default_scope: RwLock::new(default_scope),
    }
  }

  pub fn parent(&self) -> Option<&Arc<Resolver>> {
    self.parent.as_ref()
  }

  /// The scope given to new registrations.
  pub fn default_scope(&self) -> Arc<dyn Scope> {
    self.default_scope.read().clone()
  }

  /// Changes the scope given to registrations made from now on.
  pub fn set_default_scope(&self, scope: Arc<dyn Scope>) {
    *self.default_scope.write() = scope;
  }

  // --- Registration ---

  /// Registers the most general factory shape.
  ///
  /// The factory receives the resolver the resolution started on, the
  /// resolution arguments and the registration name, and may return `None`
  /// to decline. `T` may be unsized, e.g. a trait object.
  pub fn register_factory<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    factory: impl Fn(&Resolver, &Args, Option<&str>) -> Option<Arc<T>> + Send + Sync + 'static,
  ) -> RegistrationHandle<'_, T> {
    let key = ServiceKey::of::<T>(name);
    let registration = Arc::new(Registration::new(
      key.clone(),
      Box::new(factory),
      self.default_scope(),
    ));
    tracing::debug!(service = %key, "registering service");
    self
      .registrations
      .insert(key, registration.clone() as ErasedRegistration);
    RegistrationHandle::new(self, registration)
  }

  /// Registers an unnamed service built by a no-argument factory.
  pub fn register<T: Send + Sync + 'static>(
    &self,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) -> RegistrationHandle<'_, T> {
    self.register_factory(None, move |_, _, _| Some(Arc::new(factory())))
  }

  /// Registers a named service built by a no-argument factory.
  pub fn register_named<T: Send + Sync + 'static>(
    &self,
    name: &str,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) -> RegistrationHandle<'_, T> {
    self.register_factory(Some(name), move |_, _, _| Some(Arc::new(factory())))
  }

  /// Registers a service whose factory resolves its own dependencies.
  pub fn register_with<T: Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    factory: impl Fn(&Resolver) -> T + Send + Sync + 'static,
  ) -> RegistrationHandle<'_, T> {
    self.register_factory(name, move |resolver, _, _| Some(Arc::new(factory(resolver))))
  }

  /// Registers a service whose factory reads resolution arguments and may
  /// decline to build.
  pub fn register_with_args<T: Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    factory: impl Fn(&Resolver, &Args) -> Option<T> + Send + Sync + 'static,
  ) -> RegistrationHandle<'_, T> {
    self.register_factory(name, move |resolver, args, _| {
      factory(resolver, args).map(Arc::new)
    })
  }

  /// Registers a trait object implementation.
  pub fn register_trait<I: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    factory: impl Fn(&Resolver) -> Arc<I> + Send + Sync + 'static,
  ) -> RegistrationHandle<'_, I> {
    self.register_factory(name, move |resolver, _, _| Some(factory(resolver)))
  }

  /// Registers an already constructed instance. Every resolution returns it.
  pub fn register_instance<T: Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    instance: T,
  ) -> RegistrationHandle<'_, T> {
    let instance = Arc::new(instance);
    self
      .register_factory(name, move |_, _, _| Some(instance.clone()))
      .scope(scope::unique())
  }

  // --- Lookup ---

  /// Finds the registration for `T` and `name`, here or in an ancestor.
  pub fn lookup<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
  ) -> Option<Arc<Registration<T>>> {
    self.lookup_key(&ServiceKey::of::<T>(name))
  }

  pub fn is_registered<T: ?Sized + Send + Sync + 'static>(&self, name: Option<&str>) -> bool {
    self.lookup::<T>(name).is_some()
  }

  fn lookup_key<T: ?Sized + Send + Sync + 'static>(
    &self,
    key: &ServiceKey,
  ) -> Option<Arc<Registration<T>>> {
    // Clone out of the map so no shard lock is held while factories run.
    let local = self.registrations.get(key).map(|entry| entry.value().clone());
    match local {
      Some(erased) => erased.downcast::<Registration<T>>().ok(),
      None => self.parent.as_ref()?.lookup_key(key),
    }
  }

  // --- Resolution ---

  /// Resolves a service, reporting why none could be produced.
  pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    args: &Args,
  ) -> Result<Arc<T>, ResolveError> {
    // The hook runs in its own call trees, before this one starts.
    global::registration_check();
    let _frame = ResolutionFrame::enter();

    let key = ServiceKey::of::<T>(name);
    let registration = self
      .lookup_key::<T>(&key)
      .ok_or_else(|| ResolveError::MissingRegistration {
        service: key.to_string(),
      })?;

    tracing::trace!(service = %key, "resolving");
    let instance = registration
      .scope()
      .resolve(self, &*registration, args)
      .ok_or_else(|| ResolveError::FactoryReturnedNothing {
        service: key.to_string(),
      })?;

    instance.downcast::<T>().ok_or_else(|| {
      tracing::error!(service = %key, "scope returned an instance of another type");
      ResolveError::TypeMismatch {
        service: key.to_string(),
      }
    })
  }

  /// Resolves a required service.
  ///
  /// # Panics
  ///
  /// Panics if nothing is registered for the key or the factory returns
  /// nothing. A missing required dependency is a programming error; use
  /// [`optional`](Self::optional) or [`try_resolve`](Self::try_resolve) for
  /// dependencies that may legitimately be absent.
  pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self, name: Option<&str>) -> Arc<T> {
    self.resolve_with_args(name, &Args::none())
  }

  /// Resolves a required service, passing `args` to its factory.
  ///
  /// # Panics
  ///
  /// Same conditions as [`resolve`](Self::resolve).
  pub fn resolve_with_args<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    args: &Args,
  ) -> Arc<T> {
    self
      .try_resolve(name, args)
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {err}"))
  }

  /// Resolves a service, or `None` if it is not registered or its factory
  /// declines.
  pub fn optional<T: ?Sized + Send + Sync + 'static>(&self, name: Option<&str>) -> Option<Arc<T>> {
    self.optional_with_args(name, &Args::none())
  }

  pub fn optional_with_args<T: ?Sized + Send + Sync + 'static>(
    &self,
    name: Option<&str>,
    args: &Args,
  ) -> Option<Arc<T>> {
    self.try_resolve(name, args).ok()
  }
}

impl fmt::Debug for Resolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Resolver")
      .field("registrations", &self.registrations.len())
      .field("has_parent", &self.parent.is_some())
      .finish_non_exhaustive()
  }
}

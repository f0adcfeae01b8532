//! Registrations and the handle returned when one is created.

use crate::args::Args;
use crate::instance::Instance;
use crate::key::ServiceKey;
use crate::resolver::Resolver;
use crate::scope::{self, Scope};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Builds a service. Receives the resolver the resolution started on, the
/// resolution arguments and the registration name.
pub type Factory<T> =
  Box<dyn Fn(&Resolver, &Args, Option<&str>) -> Option<Arc<T>> + Send + Sync>;

/// Post-construction step, run on a freshly built service before it is shared.
pub type Mutator<T> = dyn Fn(&Resolver, &mut T, &Args) + Send + Sync;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(0);

/// The type-erased view of a registration that scopes operate on.
pub trait Provider: Send + Sync {
  fn key(&self) -> &ServiceKey;

  /// The key under which scopes cache instances of this registration.
  fn cache_key(&self) -> &str;

  /// Runs the factory (and mutator, if any). `None` if the factory declined.
  fn produce(&self, resolver: &Resolver, args: &Args) -> Option<Instance>;
}

/// A factory stored under a [`ServiceKey`], with its scope and optional mutator.
pub struct Registration<T: ?Sized> {
  key: ServiceKey,
  cache_key: String,
  factory: Factory<T>,
  scope: RwLock<Arc<dyn Scope>>,
  mutator: RwLock<Option<Arc<Mutator<T>>>>,
}

impl<T: ?Sized + Send + Sync + 'static> Registration<T> {
  pub(crate) fn new(key: ServiceKey, factory: Factory<T>, scope: Arc<dyn Scope>) -> Self {
    // The serial keeps a replacement registration from seeing the old one's cache.
    let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
    Self {
      cache_key: format!("{key}#{serial}"),
      key,
      factory,
      scope: RwLock::new(scope),
      mutator: RwLock::new(None),
    }
  }

  pub fn scope(&self) -> Arc<dyn Scope> {
    self.scope.read().clone()
  }

  pub(crate) fn set_scope(&self, scope: Arc<dyn Scope>) {
    *self.scope.write() = scope;
  }

  pub(crate) fn set_mutator(&self, mutator: Arc<Mutator<T>>) {
    *self.mutator.write() = Some(mutator);
  }

  /// Builds a typed service, bypassing the scope.
  pub(crate) fn build(&self, resolver: &Resolver, args: &Args) -> Option<Arc<T>> {
    let mut service = (self.factory)(resolver, args, self.key.name())?;
    let mutator = self.mutator.read().clone();
    if let Some(mutator) = mutator {
      match Arc::get_mut(&mut service) {
        Some(target) => mutator(resolver, target, args),
        None => tracing::warn!(
          service = %self.key,
          "factory returned a shared instance, skipping property resolution"
        ),
      }
    }
    Some(service)
  }
}

impl<T: ?Sized + Send + Sync + 'static> Provider for Registration<T> {
  fn key(&self) -> &ServiceKey {
    &self.key
  }

  fn cache_key(&self) -> &str {
    &self.cache_key
  }

  fn produce(&self, resolver: &Resolver, args: &Args) -> Option<Instance> {
    self.build(resolver, args).map(Instance::new)
  }
}

impl<T: ?Sized> fmt::Debug for Registration<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registration")
      .field("key", &self.key)
      .field("cache_key", &self.cache_key)
      .field("has_mutator", &self.mutator.read().is_some())
      .finish_non_exhaustive()
  }
}

/// Returned by the `register*` methods to configure the new registration.
///
/// ```
/// use fibre_resolver::{scope, Resolver};
///
/// struct Counter { hits: u32 }
///
/// let resolver = Resolver::new();
/// resolver
///   .register(|| Counter { hits: 0 })
///   .scope(scope::unique())
///   .resolve_properties(|_, counter, _| counter.hits += 1);
///
/// assert_eq!(resolver.resolve::<Counter>(None).hits, 1);
/// ```
pub struct RegistrationHandle<'a, T: ?Sized> {
  resolver: &'a Resolver,
  registration: Arc<Registration<T>>,
}

impl<'a, T: ?Sized + Send + Sync + 'static> RegistrationHandle<'a, T> {
  pub(crate) fn new(resolver: &'a Resolver, registration: Arc<Registration<T>>) -> Self {
    Self {
      resolver,
      registration,
    }
  }

  /// Sets the caching scope for this registration.
  pub fn scope(self, scope: Arc<dyn Scope>) -> Self {
    self.registration.set_scope(scope);
    self
  }

  /// Installs a mutator that runs on every freshly constructed instance.
  ///
  /// The mutator receives `&mut T` and is skipped (with a warning) when the
  /// factory returns an `Arc` that is already shared elsewhere.
  pub fn resolve_properties(
    self,
    mutator: impl Fn(&Resolver, &mut T, &Args) + Send + Sync + 'static,
  ) -> Self {
    self.registration.set_mutator(Arc::new(mutator));
    self
  }

  /// Also registers this service under the unnamed interface type `I`.
  ///
  /// Resolving `I` resolves this registration and converts it with `cast`.
  /// The forwarding registration does not cache on its own; sharing follows
  /// this registration's scope.
  pub fn implements<I: ?Sized + Send + Sync + 'static>(self, cast: fn(Arc<T>) -> Arc<I>) -> Self {
    self.forward::<I>(None, cast);
    self
  }

  /// Like [`implements`](Self::implements), under a name.
  pub fn implements_named<I: ?Sized + Send + Sync + 'static>(
    self,
    name: &str,
    cast: fn(Arc<T>) -> Arc<I>,
  ) -> Self {
    self.forward::<I>(Some(name), cast);
    self
  }

  pub fn registration(&self) -> &Arc<Registration<T>> {
    &self.registration
  }

  fn forward<I: ?Sized + Send + Sync + 'static>(&self, name: Option<&str>, cast: fn(Arc<T>) -> Arc<I>) {
    let target = self.registration.key.name().map(str::to_owned);
    self
      .resolver
      .register_factory::<I>(name, move |resolver, args, _| {
        resolver
          .optional_with_args::<T>(target.as_deref(), args)
          .map(cast)
      })
      .scope(scope::unique());
  }
}

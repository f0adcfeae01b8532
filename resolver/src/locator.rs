//! A minimal type-keyed instance map.

use crate::error::LocatorError;
use dashmap::DashMap;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// Holds at most one instance per type, looked up by the type's name.
///
/// No factories, scopes or hierarchy: a lighter alternative to [`Resolver`]
/// for small, call-site-local registries. Missing services are reported as a
/// recoverable [`LocatorError`].
///
/// [`Resolver`]: crate::Resolver
///
/// ```
/// use fibre_resolver::{LocatorError, ServiceLocator};
///
/// let locator = ServiceLocator::new();
/// locator.add(String::from("cache-dir"));
///
/// assert_eq!(*locator.get::<String>().unwrap(), "cache-dir");
/// assert!(matches!(locator.get::<u32>(), Err(LocatorError::NotFound { .. })));
/// ```
#[derive(Default)]
pub struct ServiceLocator {
  services: DashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl ServiceLocator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `instance`, replacing any earlier instance of the same type.
  pub fn add<T: Send + Sync + 'static>(&self, instance: T) {
    self.add_arc(Arc::new(instance));
  }

  /// Stores a shared instance; `T` may be a trait object.
  pub fn add_arc<T: ?Sized + Send + Sync + 'static>(&self, instance: Arc<T>) {
    self.services.insert(type_name::<T>(), Arc::new(instance));
  }

  pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, LocatorError> {
    let key = type_name::<T>();
    self
      .services
      .get(key)
      .and_then(|entry| entry.value().downcast_ref::<Arc<T>>().cloned())
      .ok_or_else(|| LocatorError::NotFound {
        key: key.to_owned(),
      })
  }

  pub fn contains<T: ?Sized + 'static>(&self) -> bool {
    self.services.contains_key(type_name::<T>())
  }

  /// Removes and returns the instance stored for `T`.
  pub fn remove<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, LocatorError> {
    let key = type_name::<T>();
    self
      .services
      .remove(key)
      .and_then(|(_, value)| value.downcast_ref::<Arc<T>>().cloned())
      .ok_or_else(|| LocatorError::NotFound {
        key: key.to_owned(),
      })
  }
}

impl fmt::Debug for ServiceLocator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut keys: Vec<&str> = self.services.iter().map(|entry| *entry.key()).collect();
    keys.sort_unstable();
    f.debug_struct("ServiceLocator").field("services", &keys).finish()
  }
}

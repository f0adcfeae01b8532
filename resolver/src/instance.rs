//! Type-erased service handles, the unit that scopes cache.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

trait ErasedArc: Send + Sync {
  fn as_any(&self) -> &dyn Any;
  fn downgrade(&self) -> Box<dyn ErasedWeak>;
}

impl<T: ?Sized + Send + Sync + 'static> ErasedArc for Arc<T> {
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn downgrade(&self) -> Box<dyn ErasedWeak> {
    Box::new(Arc::downgrade(self))
  }
}

trait ErasedWeak: Send + Sync {
  fn upgrade(&self) -> Option<Instance>;
}

impl<T: ?Sized + Send + Sync + 'static> ErasedWeak for Weak<T> {
  fn upgrade(&self) -> Option<Instance> {
    Weak::upgrade(self).map(Instance::new)
  }
}

/// A strong, type-erased handle to a resolved service.
///
/// Cloning an `Instance` is cheap and keeps the underlying service alive.
#[derive(Clone)]
pub struct Instance(Arc<dyn ErasedArc>);

impl Instance {
  pub fn new<T: ?Sized + Send + Sync + 'static>(service: Arc<T>) -> Self {
    Self(Arc::new(service))
  }

  /// Recovers the typed `Arc`, or `None` if this instance holds another type.
  pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
    // Deref first: the outer `Arc<dyn ErasedArc>` is itself an `ErasedArc`.
    (*self.0).as_any().downcast_ref::<Arc<T>>().cloned()
  }

  /// A non-owning handle to the same service.
  pub fn downgrade(&self) -> WeakInstance {
    WeakInstance((*self.0).downgrade())
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Instance").finish_non_exhaustive()
  }
}

/// A non-owning, type-erased handle to a resolved service.
pub struct WeakInstance(Box<dyn ErasedWeak>);

impl WeakInstance {
  /// Returns the service if some owner still holds it.
  pub fn upgrade(&self) -> Option<Instance> {
    self.0.upgrade()
  }

  pub fn is_alive(&self) -> bool {
    self.upgrade().is_some()
  }
}

impl fmt::Debug for WeakInstance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakInstance")
      .field("alive", &self.is_alive())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Named: Send + Sync {
    fn name(&self) -> &str;
  }
  struct Fixed;
  impl Named for Fixed {
    fn name(&self) -> &str {
      "fixed"
    }
  }

  #[test]
  fn downcast_returns_same_allocation() {
    let service = Arc::new(String::from("svc"));
    let instance = Instance::new(service.clone());
    let back = instance.downcast::<String>().unwrap();
    assert!(Arc::ptr_eq(&service, &back));
    assert!(instance.downcast::<u32>().is_none());
  }

  #[test]
  fn trait_objects_round_trip() {
    let service: Arc<dyn Named> = Arc::new(Fixed);
    let instance = Instance::new(service);
    assert_eq!(instance.downcast::<dyn Named>().unwrap().name(), "fixed");
  }

  #[test]
  fn weak_handle_dies_with_last_owner() {
    let instance = Instance::new(Arc::new(7_u64));
    let weak = instance.downgrade();
    assert!(weak.is_alive());
    drop(instance);
    assert!(!weak.is_alive());
    assert!(weak.upgrade().is_none());
  }
}

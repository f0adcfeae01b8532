//! Per-thread bookkeeping for the resolution call tree.

use crate::instance::Instance;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

thread_local! {
  // How many resolutions are currently on this thread's stack.
  static DEPTH: Cell<usize> = const { Cell::new(0) };
  // Instances cached by the graph scope for the current call tree.
  static GRAPH: RefCell<HashMap<String, Instance>> = RefCell::new(HashMap::new());
  // Cache keys whose construction is in progress on this thread.
  static CONSTRUCTING: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Marks a cache key as under construction on this thread.
///
/// A per-key cache waits on its own in-progress construction, so re-entering
/// the same key from inside its factory would block forever. Entering a key
/// that is already marked panics instead.
pub(crate) struct ConstructionGuard {
  cache_key: String,
  _not_send: PhantomData<*const ()>,
}

impl ConstructionGuard {
  /// # Panics
  ///
  /// Panics if `cache_key` is already under construction on this thread.
  pub(crate) fn enter(cache_key: &str, service: &dyn fmt::Display) -> Self {
    let fresh = CONSTRUCTING.with(|keys| keys.borrow_mut().insert(cache_key.to_owned()));
    if !fresh {
      tracing::error!(service = %service, "circular dependency");
      panic!("Circular dependency detected while resolving service: {service}");
    }
    Self {
      cache_key: cache_key.to_owned(),
      _not_send: PhantomData,
    }
  }
}

impl Drop for ConstructionGuard {
  fn drop(&mut self) {
    CONSTRUCTING.with(|keys| {
      keys.borrow_mut().remove(&self.cache_key);
    });
  }
}

/// An RAII marker for one level of the resolution call tree.
///
/// Entering a frame increments the thread's depth; dropping it decrements.
/// When the outermost frame drops, the graph cache for the thread is emptied.
/// The frame is tied to the thread that created it.
pub(crate) struct ResolutionFrame {
  _not_send: PhantomData<*const ()>,
}

impl ResolutionFrame {
  pub(crate) fn enter() -> Self {
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    Self {
      _not_send: PhantomData,
    }
  }

  #[cfg(test)]
  pub(crate) fn depth() -> usize {
    DEPTH.with(Cell::get)
  }
}

impl Drop for ResolutionFrame {
  fn drop(&mut self) {
    let remaining = DEPTH.with(|depth| {
      let next = depth.get().saturating_sub(1);
      depth.set(next);
      next
    });
    if remaining == 0 {
      // Take the map out first; dropping services may re-enter the resolver.
      let finished = GRAPH.with(|graph| std::mem::take(&mut *graph.borrow_mut()));
      if !finished.is_empty() {
        tracing::trace!(instances = finished.len(), "resolution tree complete, clearing graph");
      }
      drop(finished);
    }
  }
}

pub(crate) fn graph_get(cache_key: &str) -> Option<Instance> {
  GRAPH.with(|graph| graph.borrow().get(cache_key).cloned())
}

pub(crate) fn graph_insert(cache_key: &str, instance: Instance) {
  GRAPH.with(|graph| {
    graph.borrow_mut().insert(cache_key.to_owned(), instance);
  });
}

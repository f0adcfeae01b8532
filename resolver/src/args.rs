//! Arguments handed to factories at resolution time.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ArgValue = Arc<dyn Any + Send + Sync>;

/// Type-erased arguments passed through a resolution to the factory.
///
/// An `Args` carries an optional positional value and any number of keyed
/// values. Factories read them back by type; a lookup with the wrong type is
/// simply `None`.
///
/// ```
/// use fibre_resolver::Args;
///
/// let args = Args::new(42_u16).with("host", String::from("localhost"));
/// assert_eq!(args.get::<u16>(), Some(&42));
/// assert_eq!(args.value::<String>("host").map(String::as_str), Some("localhost"));
/// assert!(args.value::<u16>("host").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Args {
  value: Option<ArgValue>,
  keyed: HashMap<String, ArgValue>,
}

impl Args {
  /// Arguments carrying nothing.
  pub fn none() -> Self {
    Self::default()
  }

  /// Arguments carrying a single positional value.
  pub fn new<A: Any + Send + Sync>(value: A) -> Self {
    Self {
      value: Some(Arc::new(value)),
      keyed: HashMap::new(),
    }
  }

  /// Adds a keyed value, replacing any previous value under `key`.
  pub fn with<A: Any + Send + Sync>(mut self, key: &str, value: A) -> Self {
    self.keyed.insert(key.to_owned(), Arc::new(value));
    self
  }

  /// The positional value, if present and of type `A`.
  pub fn get<A: Any>(&self) -> Option<&A> {
    self.value.as_deref()?.downcast_ref::<A>()
  }

  /// The value stored under `key`, if present and of type `A`.
  pub fn value<A: Any>(&self, key: &str) -> Option<&A> {
    self.keyed.get(key)?.downcast_ref::<A>()
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.keyed.contains_key(key)
  }

  pub fn is_empty(&self) -> bool {
    self.value.is_none() && self.keyed.is_empty()
  }
}

impl fmt::Debug for Args {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut keys: Vec<&str> = self.keyed.keys().map(String::as_str).collect();
    keys.sort_unstable();
    f.debug_struct("Args")
      .field("has_value", &self.value.is_some())
      .field("keys", &keys)
      .finish()
  }
}

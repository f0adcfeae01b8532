use thiserror::Error;

/// Why a resolution produced no service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// No registration exists for the key in the resolver or any of its parents.
  #[error("no registration for `{service}`")]
  MissingRegistration { service: String },

  /// A registration was found but its factory declined to build an instance.
  #[error("factory for `{service}` returned nothing")]
  FactoryReturnedNothing { service: String },

  /// The scope handed back an instance of a different type than requested.
  #[error("scope returned an instance of the wrong type for `{service}`")]
  TypeMismatch { service: String },
}

/// Errors reported by [`ServiceLocator`](crate::ServiceLocator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
  #[error("service `{key}` not found in locator")]
  NotFound { key: String },
}

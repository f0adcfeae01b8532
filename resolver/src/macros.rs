//! Resolution macros for call sites.

/// Resolves a required service from [`Resolver::root`](crate::Resolver::root).
///
/// # Panics
///
/// Panics if the service cannot be resolved. Use [`optional!`] for a
/// non-panicking version.
///
/// # Examples
///
/// ```
/// use fibre_resolver::{resolve, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// Resolver::main().register_named("greeting", || String::from("hello"));
/// Resolver::main().register_trait::<dyn Greeter>(None, |_| Arc::new(EnglishGreeter));
///
/// assert_eq!(*resolve!(String, "greeting"), "hello");
/// assert_eq!(resolve!(trait Greeter).greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  (trait $trait_ident:ident) => {
    $crate::Resolver::root().resolve::<dyn $trait_ident>(None)
  };
  (trait $trait_ident:ident, $name:expr) => {
    $crate::Resolver::root().resolve::<dyn $trait_ident>(Some($name))
  };
  ($type:ty) => {
    $crate::Resolver::root().resolve::<$type>(None)
  };
  ($type:ty, $name:expr) => {
    $crate::Resolver::root().resolve::<$type>(Some($name))
  };
}

/// Resolves a service from [`Resolver::root`](crate::Resolver::root),
/// evaluating to `Option<Arc<_>>`.
#[macro_export]
macro_rules! optional {
  (trait $trait_ident:ident) => {
    $crate::Resolver::root().optional::<dyn $trait_ident>(None)
  };
  (trait $trait_ident:ident, $name:expr) => {
    $crate::Resolver::root().optional::<dyn $trait_ident>(Some($name))
  };
  ($type:ty) => {
    $crate::Resolver::root().optional::<$type>(None)
  };
  ($type:ty, $name:expr) => {
    $crate::Resolver::root().optional::<$type>(Some($name))
  };
}

/// Like [`resolve!`], against an explicit resolver.
///
/// ```
/// use fibre_resolver::{resolve_from, Resolver};
///
/// let resolver = Resolver::new();
/// resolver.register(|| 7_u8);
/// assert_eq!(*resolve_from!(resolver, u8), 7);
/// ```
#[macro_export]
macro_rules! resolve_from {
  ($resolver:expr, trait $trait_ident:ident) => {
    $resolver.resolve::<dyn $trait_ident>(None)
  };
  ($resolver:expr, trait $trait_ident:ident, $name:expr) => {
    $resolver.resolve::<dyn $trait_ident>(Some($name))
  };
  ($resolver:expr, $type:ty) => {
    $resolver.resolve::<$type>(None)
  };
  ($resolver:expr, $type:ty, $name:expr) => {
    $resolver.resolve::<$type>(Some($name))
  };
}

/// Like [`optional!`], against an explicit resolver.
#[macro_export]
macro_rules! optional_from {
  ($resolver:expr, trait $trait_ident:ident) => {
    $resolver.optional::<dyn $trait_ident>(None)
  };
  ($resolver:expr, trait $trait_ident:ident, $name:expr) => {
    $resolver.optional::<dyn $trait_ident>(Some($name))
  };
  ($resolver:expr, $type:ty) => {
    $resolver.optional::<$type>(None)
  };
  ($resolver:expr, $type:ty, $name:expr) => {
    $resolver.optional::<$type>(Some($name))
  };
}

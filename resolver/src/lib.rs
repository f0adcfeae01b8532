//! # Fibre Resolver
//!
//! A thread-safe dependency resolver for Rust with named registrations,
//! pluggable caching scopes and hierarchical resolvers.
//!
//! ## Core Concepts
//!
//! - **Resolver**: a registry of factories keyed by service type and an
//!   optional name. A resolver may have a parent it falls back to.
//! - **Scopes**: each registration has a scope deciding how instances are
//!   shared: `unique`, `application` (the default), `cached`, `shared` or
//!   `graph`. See the [`scope`] module.
//! - **Resolution**: [`Resolver::resolve`] and the [`resolve!`] macro panic if a
//!   required service is missing; [`Resolver::optional`] and [`optional!`]
//!   return `None` instead.
//! - **Process-wide resolvers**: [`Resolver::main`] receives registrations from
//!   the hook installed with [`set_registration_hook`]; [`Resolver::root`] is
//!   what the macros resolve from.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_resolver::{resolve, scope, Resolver};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: Arc<String>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.to_string()
//!   }
//! }
//!
//! let main = Resolver::main();
//! main.register_named("greeting", || String::from("Hello, World!"));
//! main
//!   .register_with(None, |r| EnglishGreeter {
//!     message: r.resolve::<String>(Some("greeting")),
//!   })
//!   .scope(scope::graph())
//!   .implements::<dyn Greeter>(|g| g as Arc<dyn Greeter>);
//!
//! let greeter = resolve!(trait Greeter);
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

mod args;
mod builder;
mod context;
mod error;
mod global;
mod instance;
mod key;
mod locator;
mod macros;
mod registration;
mod resolver;
pub mod scope;

pub use args::Args;
pub use builder::ResolverBuilder;
pub use error::{LocatorError, ResolveError};
pub use global::set_registration_hook;
pub use instance::{Instance, WeakInstance};
pub use key::ServiceKey;
pub use locator::ServiceLocator;
pub use registration::{Factory, Mutator, Provider, Registration, RegistrationHandle};
pub use resolver::Resolver;
pub use scope::Scope;

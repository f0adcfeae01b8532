use fibre_resolver::{Args, ResolveError, Resolver, ServiceLocator};
use std::panic;

struct UnregisteredService;

fn main() {
  let resolver = Resolver::new();

  // --- The panicking `resolve` ---
  println!("Attempting to resolve a service that was never registered...");
  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    let _service = resolver.resolve::<UnregisteredService>(None);
  }));
  assert!(result.is_err(), "resolve should have panicked.");
  println!("Caught the expected panic.");

  // --- The non-panicking alternatives ---
  assert!(resolver.optional::<UnregisteredService>(None).is_none());
  match resolver.try_resolve::<UnregisteredService>(None, &Args::none()) {
    Err(err @ ResolveError::MissingRegistration { .. }) => println!("try_resolve: {err}"),
    other => panic!("unexpected result: {:?}", other.map(|_| ())),
  }

  // --- The locator reports a recoverable error ---
  let locator = ServiceLocator::new();
  if let Err(err) = locator.get::<UnregisteredService>() {
    println!("locator: {err}");
  }
}

use fibre_resolver::{scope, Resolver};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing_subscriber::EnvFilter;

// A service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tracker() -> RequestTracker {
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() {
  // RUST_LOG=fibre_resolver=trace shows registrations and cache hits.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let resolver = Resolver::new();
  resolver.register_named("application", tracker).scope(scope::application());
  resolver.register_named("unique", tracker).scope(scope::unique());
  resolver.register_named("shared", tracker).scope(scope::shared());

  println!("--- Application ---");
  let a1 = resolver.resolve::<RequestTracker>(Some("application"));
  let a2 = resolver.resolve::<RequestTracker>(Some("application"));
  println!("ids: {} {}", a1.id, a2.id);
  assert!(Arc::ptr_eq(&a1, &a2));

  println!("--- Unique ---");
  let u1 = resolver.resolve::<RequestTracker>(Some("unique"));
  let u2 = resolver.resolve::<RequestTracker>(Some("unique"));
  println!("ids: {} {}", u1.id, u2.id);
  assert!(!Arc::ptr_eq(&u1, &u2));

  println!("--- Shared ---");
  let s1 = resolver.resolve::<RequestTracker>(Some("shared"));
  let s2 = resolver.resolve::<RequestTracker>(Some("shared"));
  println!("held: {} {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2));
  let old_id = s1.id;
  drop(s1);
  drop(s2);
  let s3 = resolver.resolve::<RequestTracker>(Some("shared"));
  println!("after release: {}", s3.id);
  assert_ne!(old_id, s3.id);
}

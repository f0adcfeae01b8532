use fibre_resolver::scope::{self, ScopeCached, ScopeShared};
use fibre_resolver::Resolver;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::thread;

// --- Test Fixtures ---

struct Logger {
  counter: usize,
}

struct Tracked {
  id: usize,
}

fn counting_factory() -> impl Fn() -> Tracked + Send + Sync + 'static {
  let counter = Arc::new(AtomicUsize::new(0));
  move || Tracked {
    id: counter.fetch_add(1, Ordering::SeqCst) + 1,
  }
}

// --- Unique / Application ---

#[test]
fn test_unique_then_application_logger_scenario() {
  let resolver = Resolver::new();

  // Unique: three resolutions, three loggers, counter incremented once each.
  let counter = Arc::new(AtomicUsize::new(0));
  let c = counter.clone();
  resolver
    .register(move || Logger {
      counter: c.fetch_add(1, Ordering::SeqCst) + 1,
    })
    .scope(scope::unique());

  let loggers: Vec<_> = (0..3).map(|_| resolver.resolve::<Logger>(None)).collect();
  assert_eq!(
    loggers.iter().map(|l| l.counter).collect::<Vec<_>>(),
    vec![1, 2, 3]
  );
  assert!(!Arc::ptr_eq(&loggers[0], &loggers[1]));
  assert!(!Arc::ptr_eq(&loggers[1], &loggers[2]));

  // Application: re-registered with a fresh counter, one instance for all three.
  let counter = Arc::new(AtomicUsize::new(0));
  let c = counter.clone();
  resolver
    .register(move || Logger {
      counter: c.fetch_add(1, Ordering::SeqCst) + 1,
    })
    .scope(scope::application());

  let loggers: Vec<_> = (0..3).map(|_| resolver.resolve::<Logger>(None)).collect();
  assert!(loggers.iter().all(|l| l.counter == 1));
  assert!(Arc::ptr_eq(&loggers[0], &loggers[2]));
  assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_application_scope_constructs_once_under_concurrency() {
  // Arrange
  let executions = Arc::new(AtomicUsize::new(0));
  let resolver = Resolver::new();
  let count = executions.clone();
  resolver.register(move || {
    count.fetch_add(1, Ordering::SeqCst);
    // Widen the window for a racing construction.
    thread::sleep(std::time::Duration::from_millis(50));
    Tracked { id: 0 }
  });

  // Act
  let resolved: Vec<Arc<Tracked>> = thread::scope(|s| {
    let handles: Vec<_> = (0..16)
      .map(|_| s.spawn(|| resolver.resolve::<Tracked>(None)))
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  // Assert
  assert_eq!(executions.load(Ordering::SeqCst), 1);
  assert!(resolved.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
#[should_panic(expected = "Circular dependency detected")]
fn test_application_cycle_panics_instead_of_hanging() {
  struct Left {
    _right: Arc<Right>,
  }
  struct Right {
    _left: Arc<Left>,
  }

  let resolver = Resolver::new();
  resolver.register_with(None, |r| Left { _right: r.resolve(None) });
  resolver.register_with(None, |r| Right { _left: r.resolve(None) });

  resolver.resolve::<Left>(None);
}

#[test]
fn test_cached_scope_recovers_after_cycle_panic() {
  // Arrange: a service that resolves itself, and an unrelated one.
  struct Looping;
  let cache = Arc::new(ScopeCached::new());
  let resolver = Resolver::new();
  resolver
    .register_with(None, |r| {
      r.resolve::<Looping>(None);
      Looping
    })
    .scope(cache.clone());
  resolver.register(counting_factory()).scope(cache.clone());

  // Act
  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    resolver.resolve::<Looping>(None);
  }));

  // Assert: the failed construction left nothing behind on this thread.
  assert!(result.is_err());
  assert_eq!(resolver.resolve::<Tracked>(None).id, 1);
  assert_eq!(cache.len(), 1);
}

// --- Cached ---

#[test]
fn test_cached_scope_holds_until_reset() {
  // Arrange: a private cache so other tests cannot reset it.
  let session = Arc::new(ScopeCached::new());
  let resolver = Resolver::new();
  resolver.register(counting_factory()).scope(session.clone());

  // Act
  let a = resolver.resolve::<Tracked>(None);
  let b = resolver.resolve::<Tracked>(None);
  assert_eq!(session.len(), 1);
  session.reset();
  let c = resolver.resolve::<Tracked>(None);

  // Assert
  assert!(Arc::ptr_eq(&a, &b));
  assert_eq!(a.id, 1);
  assert!(!Arc::ptr_eq(&a, &c));
  assert_eq!(c.id, 2);
}

#[test]
fn test_independent_cached_scopes_do_not_share_resets() {
  let first = Arc::new(ScopeCached::new());
  let second = Arc::new(ScopeCached::new());
  let resolver = Resolver::new();
  resolver.register_named("first", counting_factory()).scope(first.clone());
  resolver.register_named("second", counting_factory()).scope(second.clone());

  let f1 = resolver.resolve::<Tracked>(Some("first"));
  let s1 = resolver.resolve::<Tracked>(Some("second"));
  first.reset();

  assert!(!Arc::ptr_eq(&f1, &resolver.resolve::<Tracked>(Some("first"))));
  assert!(Arc::ptr_eq(&s1, &resolver.resolve::<Tracked>(Some("second"))));
}

// --- Shared ---

#[test]
fn test_shared_scope_lives_as_long_as_an_owner() {
  // Arrange
  let shared = Arc::new(ScopeShared::new());
  let resolver = Resolver::new();
  resolver.register(counting_factory()).scope(shared.clone());

  // Act & Assert: while `first` is held, resolutions return it.
  let first = resolver.resolve::<Tracked>(None);
  let again = resolver.resolve::<Tracked>(None);
  assert!(Arc::ptr_eq(&first, &again));
  assert_eq!(shared.live(), 1);

  // Once every owner has dropped it, a new instance is built.
  drop(first);
  drop(again);
  assert_eq!(shared.live(), 0);
  let rebuilt = resolver.resolve::<Tracked>(None);
  assert_eq!(rebuilt.id, 2);

  drop(rebuilt);
  shared.purge();
  assert_eq!(shared.live(), 0);
}

#[test]
fn test_shared_scope_race_leaves_one_live_slot() {
  // Arrange
  let shared = Arc::new(ScopeShared::new());
  let executions = Arc::new(AtomicUsize::new(0));
  let resolver = Resolver::new();
  let count = executions.clone();
  resolver
    .register(move || {
      let id = count.fetch_add(1, Ordering::SeqCst);
      // Widen the window so misses overlap.
      thread::sleep(std::time::Duration::from_millis(50));
      Tracked { id }
    })
    .scope(shared.clone());

  // Act: hold every result so no instance dies during the race.
  let held: Vec<Arc<Tracked>> = thread::scope(|s| {
    let handles: Vec<_> = (0..16)
      .map(|_| s.spawn(|| resolver.resolve::<Tracked>(None)))
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  // Assert: every caller got an instance and the slot kept one of them.
  assert_eq!(held.len(), 16);
  assert!(executions.load(Ordering::SeqCst) >= 1);
  assert_eq!(shared.len(), 1);
  assert_eq!(shared.live(), 1);
  let later = resolver.resolve::<Tracked>(None);
  assert!(held.iter().any(|instance| Arc::ptr_eq(instance, &later)));
}

// --- Graph ---

struct Leaf {
  id: usize,
}
struct Left {
  leaf: Arc<Leaf>,
}
struct Right {
  leaf: Arc<Leaf>,
}
struct Root {
  left: Arc<Left>,
  right: Arc<Right>,
}

fn diamond(resolver: &Resolver) -> Arc<AtomicUsize> {
  let built = Arc::new(AtomicUsize::new(0));
  let counter = built.clone();
  resolver
    .register(move || Leaf {
      id: counter.fetch_add(1, Ordering::SeqCst),
    })
    .scope(scope::graph());
  resolver
    .register_with(None, |r| Left { leaf: r.resolve(None) })
    .scope(scope::graph());
  resolver
    .register_with(None, |r| Right { leaf: r.resolve(None) })
    .scope(scope::graph());
  resolver
    .register_with(None, |r| Root {
      left: r.resolve(None),
      right: r.resolve(None),
    })
    .scope(scope::graph());
  built
}

#[test]
fn test_graph_scope_shares_within_one_tree() {
  // Arrange
  let resolver = Resolver::new();
  let built = diamond(&resolver);

  // Act
  let first = resolver.resolve::<Root>(None);
  let second = resolver.resolve::<Root>(None);

  // Assert: one leaf per tree, shared by both branches.
  assert!(Arc::ptr_eq(&first.left.leaf, &first.right.leaf));
  assert!(Arc::ptr_eq(&second.left.leaf, &second.right.leaf));
  assert!(!Arc::ptr_eq(&first.left.leaf, &second.left.leaf));
  assert_eq!(first.left.leaf.id, 0);
  assert_eq!(second.left.leaf.id, 1);
  assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_graph_scope_under_unique_root_still_shares() {
  // The tree is bounded by the outermost resolution, whatever its scope.
  let resolver = Resolver::new();
  diamond(&resolver);
  resolver
    .register_with(Some("unique_root"), |r| Root {
      left: r.resolve(None),
      right: r.resolve(None),
    })
    .scope(scope::unique());

  let root = resolver.resolve::<Root>(Some("unique_root"));
  assert!(Arc::ptr_eq(&root.left.leaf, &root.right.leaf));
}

#[test]
fn test_graph_scope_does_not_leak_between_threads() {
  let resolver = Resolver::new();
  diamond(&resolver);

  let roots: Vec<Arc<Root>> = thread::scope(|s| {
    let handles: Vec<_> = (0..4)
      .map(|_| s.spawn(|| resolver.resolve::<Root>(None)))
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  for (i, a) in roots.iter().enumerate() {
    assert!(Arc::ptr_eq(&a.left.leaf, &a.right.leaf));
    for b in &roots[i + 1..] {
      assert!(!Arc::ptr_eq(&a.left.leaf, &b.left.leaf));
    }
  }
}

#[test]
fn test_scopes_compose_in_one_tree() {
  // An application-scoped dependency inside a unique service is reused,
  // while the unique service itself is rebuilt.
  struct Pool;
  struct Handler {
    pool: Arc<Pool>,
  }

  let resolver = Resolver::new();
  resolver.register(|| Pool).scope(scope::application());
  resolver
    .register_with(None, |r| Handler { pool: r.resolve(None) })
    .scope(scope::unique());

  let h1 = resolver.resolve::<Handler>(None);
  let h2 = resolver.resolve::<Handler>(None);
  assert!(!Arc::ptr_eq(&h1, &h2));
  assert!(Arc::ptr_eq(&h1.pool, &h2.pool));
}

#[test]
fn test_default_scope_applies_to_new_registrations() {
  let resolver = Resolver::new();
  resolver.set_default_scope(scope::unique());
  resolver.register(counting_factory());

  let a = resolver.resolve::<Tracked>(None);
  let b = resolver.resolve::<Tracked>(None);
  assert!(!Arc::ptr_eq(&a, &b));
  assert_eq!((a.id, b.id), (1, 2));
}

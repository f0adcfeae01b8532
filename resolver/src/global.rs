//! The process-wide resolvers and the one-time registration hook.

use crate::resolver::Resolver;
use crate::scope;
use once_cell::sync::Lazy;
use parking_lot::{ReentrantMutex, RwLock};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type RegistrationHook = dyn Fn(&Resolver) + Send + Sync;

struct Roots {
  main: Arc<Resolver>,
  root: Arc<Resolver>,
}

static ROOTS: Lazy<RwLock<Roots>> = Lazy::new(|| {
  let main = Arc::new(Resolver::new());
  RwLock::new(Roots {
    root: main.clone(),
    main,
  })
});

static HOOK: Lazy<RwLock<Option<Arc<RegistrationHook>>>> = Lazy::new(|| RwLock::new(None));

// Set while the hook still has to run before the next resolution.
static ARMED: AtomicBool = AtomicBool::new(true);

// Held while the hook runs. The cell marks the hook as in progress so that
// resolutions made by the hook itself pass straight through.
static REGISTERING: Lazy<ReentrantMutex<Cell<bool>>> =
  Lazy::new(|| ReentrantMutex::new(Cell::new(false)));

/// Installs the bulk-registration hook and arms it.
///
/// Before the next resolution on any resolver, the hook runs exactly once with
/// [`Resolver::main`]. Other threads resolving at the same time wait for it to
/// finish. [`Resolver::reset`] arms it again.
///
/// ```
/// use fibre_resolver::{set_registration_hook, Resolver};
///
/// struct Config { port: u16 }
///
/// set_registration_hook(|main| {
///   main.register(|| Config { port: 8080 });
/// });
///
/// assert_eq!(Resolver::root().resolve::<Config>(None).port, 8080);
/// ```
pub fn set_registration_hook(hook: impl Fn(&Resolver) + Send + Sync + 'static) {
  *HOOK.write() = Some(Arc::new(hook));
  ARMED.store(true, Ordering::Release);
}

pub(crate) fn registration_check() {
  if !ARMED.load(Ordering::Acquire) {
    return;
  }

  let running = REGISTERING.lock();
  if running.get() || !ARMED.load(Ordering::Acquire) {
    return;
  }

  let hook = HOOK.read().clone();
  // Disarms on every exit, including a panicking hook, so only `reset` or a
  // new hook arms it again.
  let _run = HookRun::start(&running);
  if let Some(hook) = hook {
    tracing::debug!("running registration hook");
    hook(&Resolver::main());
  }
}

struct HookRun<'a> {
  running: &'a Cell<bool>,
}

impl<'a> HookRun<'a> {
  fn start(running: &'a Cell<bool>) -> Self {
    running.set(true);
    Self { running }
  }
}

impl Drop for HookRun<'_> {
  fn drop(&mut self) {
    self.running.set(false);
    ARMED.store(false, Ordering::Release);
    if std::thread::panicking() {
      tracing::error!("registration hook panicked; it stays disarmed until reset");
    }
  }
}

impl Resolver {
  /// The resolver used by the resolution macros.
  ///
  /// Initially the same resolver as [`main`](Self::main). Tests commonly
  /// replace it with a child of `main` that overrides a few services.
  pub fn root() -> Arc<Resolver> {
    ROOTS.read().root.clone()
  }

  /// The resolver the registration hook populates.
  pub fn main() -> Arc<Resolver> {
    ROOTS.read().main.clone()
  }

  /// Replaces the root resolver.
  pub fn set_root(resolver: Arc<Resolver>) {
    let previous = std::mem::replace(&mut ROOTS.write().root, resolver);
    drop(previous);
  }

  /// Restores the process-wide state to a fresh start.
  ///
  /// `main` and `root` become one new empty resolver, the built-in
  /// application and cached scopes are cleared, and the built-in shared scope
  /// drops its dead entries. The registration hook is armed again, even if it
  /// panicked last time. Intended for test isolation.
  pub fn reset() {
    let fresh = Arc::new(Resolver::new());
    let previous = {
      let mut roots = ROOTS.write();
      let main = std::mem::replace(&mut roots.main, fresh.clone());
      let root = std::mem::replace(&mut roots.root, fresh);
      (main, root)
    };
    // Released outside the lock; dropping registrations may drop services.
    drop(previous);

    scope::application().reset();
    scope::cached().reset();
    // Dropping the old registrations usually leaves dead weak entries behind.
    scope::shared().purge();
    ARMED.store(true, Ordering::Release);
    tracing::debug!("resolver state reset");
  }
}

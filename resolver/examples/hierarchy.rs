use fibre_resolver::{resolve, set_registration_hook, Resolver};
use std::sync::Arc;

trait Notifier: Send + Sync {
  fn notify(&self, msg: &str) -> String;
}

struct EmailNotifier;
impl Notifier for EmailNotifier {
  fn notify(&self, msg: &str) -> String {
    format!("email: {msg}")
  }
}

struct RecordingNotifier;
impl Notifier for RecordingNotifier {
  fn notify(&self, msg: &str) -> String {
    format!("recorded: {msg}")
  }
}

struct Signup {
  notifier: Arc<dyn Notifier>,
}

fn main() {
  // All application registrations in one place, run lazily on first use.
  set_registration_hook(|main| {
    main.register_trait::<dyn Notifier>(None, |_| Arc::new(EmailNotifier));
    main.register_with(None, |r| Signup {
      notifier: r.resolve(None),
    });
  });

  let signup = resolve!(Signup);
  println!("{}", signup.notifier.notify("welcome"));

  // Swap the root for a child of main that overrides the notifier.
  let mock = Arc::new(Resolver::with_parent(Resolver::main()));
  mock.register_trait::<dyn Notifier>(None, |_| Arc::new(RecordingNotifier));
  Resolver::set_root(mock.clone());

  let notifier = resolve!(trait Notifier);
  println!("{}", notifier.notify("welcome"));
  assert_eq!(notifier.notify("x"), "recorded: x");
}

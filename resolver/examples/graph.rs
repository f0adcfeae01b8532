use fibre_resolver::{scope, Resolver};
use std::sync::Arc;

struct Connection;

struct Reader {
  conn: Arc<Connection>,
}

struct Writer {
  conn: Arc<Connection>,
}

struct UnitOfWork {
  reader: Arc<Reader>,
  writer: Arc<Writer>,
}

fn main() {
  let resolver = Resolver::builder().default_scope(scope::graph()).build();
  resolver.register(|| Connection);
  resolver.register_with(None, |r| Reader { conn: r.resolve(None) });
  resolver.register_with(None, |r| Writer { conn: r.resolve(None) });
  resolver.register_with(None, |r| UnitOfWork {
    reader: r.resolve(None),
    writer: r.resolve(None),
  });

  let first = resolver.resolve::<UnitOfWork>(None);
  let second = resolver.resolve::<UnitOfWork>(None);

  // Reader and writer share a connection within one unit of work...
  assert!(Arc::ptr_eq(&first.reader.conn, &first.writer.conn));
  // ...but every unit of work gets its own.
  assert!(!Arc::ptr_eq(&first.reader.conn, &second.reader.conn));
  println!("Each unit of work shares one connection between reader and writer.");
}

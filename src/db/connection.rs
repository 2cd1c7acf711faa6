use super::{import::*, error::Error};
use diesel::prelude::{RunQueryDsl, SqliteConnection};
use diesel::r2d2::{
    CustomizeConnection,
    ConnectionManager,
    Pool,
    PooledConnection
};

/// A connection Pool managing SqliteConnections
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// A connection customizer which enables foreign key support
#[derive(Debug)]
struct ConnectionCustomizer ();
impl<C: diesel::Connection, E> CustomizeConnection<C, E> for ConnectionCustomizer
{
    fn on_acquire(&self, connection: &mut C) -> Result<(), E> {
        // FIXME: I cannot for the life of me figure
        // out how to return a proper error here.
        diesel::dsl::sql_query(format!("PRAGMA foreign_keys = ON"))
            .execute(connection)
            .expect("pragma error: failed to enable foreign key support");
        Ok(())
    }
}

/// The tables this subsystem owns. The surrounding platform
/// provisions the domain tables; these three are ours.
const DDL: [&'static str; 3] = [
    "CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        kind BIGINT NOT NULL,
        description TEXT,
        UNIQUE (name, kind)
    )",
    "CREATE TABLE IF NOT EXISTS tagged_objects (
        tag_id BIGINT NOT NULL REFERENCES tags (id),
        object_kind BIGINT NOT NULL,
        object_id BIGINT NOT NULL,
        PRIMARY KEY (tag_id, object_kind, object_id)
    )",
    "CREATE TABLE IF NOT EXISTS user_favorite_tags (
        user_id BIGINT NOT NULL,
        tag_id BIGINT NOT NULL REFERENCES tags (id),
        PRIMARY KEY (user_id, tag_id)
    )",
];

/// Provision the schema. Idempotent.
pub fn initialize(c: &Connection) -> Res<()> {
    for ddl in DDL.iter() {
        diesel::dsl::sql_query(*ddl).execute(c.get())?;
    }
    Ok(())
}

pub struct Connection(pub PooledConnection<ConnectionManager<SqliteConnection>>);

impl Connection {

    /// Create a new connection pool.
    pub fn new_pool(database_url: &str, max_size: u32) -> Res<SqlitePool> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(ConnectionCustomizer { }))
            .build(manager)
            .map_err(|e| Error::ConnectionPoolError { message: format!("{:?}", e) }.into())
    }

    /// Return the underlying connection.
    #[inline(always)]
    pub fn get(&self) -> &SqliteConnection {
        &self.0
    }
}

#[cfg(test)]
mod suite {
    use super::*;

    #[test]
    fn check_initialize_idempotent() {
        let pool = Connection::new_pool(":memory:", 1).unwrap();
        let c = Connection(pool.get().unwrap());
        initialize(&c).unwrap();
        initialize(&c).unwrap();
    }
}

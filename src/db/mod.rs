pub mod schema;
pub mod connection;

pub mod error {
    #[derive(Debug, Fail)]
    pub enum Error {
        #[fail(display = "connection pool error: '{}'", message)]
        ConnectionPoolError { message: String, },
    }
}

pub mod import {
    pub use super::super::import::*;
}

pub mod export {
    pub use super::schema::*;
    pub use super::{connection as db};
}
pub use export::*;

#[cfg(test)]
pub mod test {
    use super::connection;

    /// A fresh in-memory database with the schema applied.
    /// The pool holds a single connection so every statement
    /// in a test sees the same memory database.
    pub fn connection() -> connection::Connection {
        let pool = connection::Connection::new_pool(":memory:", 1)
            .expect("test database pool");
        let c = connection::Connection(pool.get().expect("test database connection"));
        connection::initialize(&c).expect("test database schema");
        c
    }
}

// Database service module
// SQLite connection and work block schema management

mod connection;
pub mod migrations;
mod schema;

pub use connection::Database;

//! Service layer for the user datastore.
//! - `storage` owns the raw JSON file I/O.
//! - `file::user_store` applies the user rules on top of it.
//! - `users` is the trait the HTTP layer talks to.

pub mod errors;
pub mod storage;
pub mod file;
pub mod users;
pub mod greeting;

pub mod errors;
pub mod user;

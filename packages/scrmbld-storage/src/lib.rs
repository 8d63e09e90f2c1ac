pub mod catalog;
pub mod db;
pub mod listened;
pub mod models;
pub mod notes;
pub mod ratings;
pub mod reviews;
pub mod schema;
pub mod users;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

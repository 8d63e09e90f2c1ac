pub mod catalog;
pub mod note;
pub mod rating;
pub mod score;
pub mod time_serde;

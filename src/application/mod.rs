pub mod engagement;
pub mod error;
pub mod feed;
pub mod posts;
pub mod repos;

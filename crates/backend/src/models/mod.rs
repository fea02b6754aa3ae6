pub mod favorite;
pub mod resource;
pub mod user;

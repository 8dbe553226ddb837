pub mod chat;
pub mod photos;

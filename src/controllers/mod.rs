pub mod chat;
pub mod forge;
pub mod health;
pub mod weather;

pub mod chat;
pub mod forge;
pub mod generation;
pub mod quota;
pub mod weather;

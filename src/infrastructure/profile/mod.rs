pub mod middleware;
pub mod request_id;

pub use middleware::{profile_middleware, ClientProfile, X_CLIENT_PROFILE};
pub use request_id::{request_id_middleware, RequestId};

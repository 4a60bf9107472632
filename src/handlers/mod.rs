mod echo;
mod health;

pub use echo::{ROOT_ROUTE, SERVICE_ROUTE, echo_headers, greet_identity};
pub use health::health_check;

pub mod routes;
pub mod server;
pub mod types;

pub use routes::AppState;
pub use server::ApiServer;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware stack)
//!     → request.rs (request ID, user agent)
//!     → homepage.rs (GET /) | rolldice.rs (GET /rolldice)
//!     → response.rs (line body, write-failure logging)
//!     → Send to client
//! ```

pub mod homepage;
pub mod request;
pub mod response;
pub mod rolldice;
pub mod server;

pub use homepage::{HOMEPAGE_HINT, ROLL_PATH};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::LineBody;
pub use server::{AppState, HttpServer, RollSettings};

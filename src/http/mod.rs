//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, shutdown)
//!     → request.rs (request ID, DispatchRequest, query/form parsing)
//!     → [dispatch: walk, inject, bind, invoke, settle]
//!     → cookies.rs (Set-Cookie for modified cookies)
//!     → response.rs (DispatchResponse into axum Response)
//!     → Send to client
//! ```

pub mod cookies;
pub mod request;
pub mod response;
pub mod server;

pub use cookies::CookieJar;
pub use request::{DispatchRequest, MakeRequestUuid, Params, RequestView, X_REQUEST_ID};
pub use response::{DispatchResponse, Redirect, RedirectStatus, ResponseSignal};
pub use server::HttpServer;

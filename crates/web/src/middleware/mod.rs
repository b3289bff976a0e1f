//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction), added by the binary
//! 2. `TraceLayer` (`http_request` span per request)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Session layer (tower-sessions with `SQLite` store)
//!
//! Authentication is enforced per handler through the [`RequireAuth`]
//! extractor rather than as a layer.

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_user, current_user, safe_next, set_current_user};
pub use flash::{set_flash, take_flash};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};

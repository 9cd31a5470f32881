//! HTTP adapter for AI usage endpoints.
//!
//! - `GET /api/ai/usage` - Current quota decision for the caller
//! - `POST /api/ai/usage` - Count one AI request for the caller
//! - `POST /api/admin/ai/usage/:user_id/reset` - Clear a user's usage (admin)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{AiUsageApiError, AiUsageAppState, AuthenticatedUser};
pub use routes::{admin_routes, ai_usage_router, ai_usage_routes};

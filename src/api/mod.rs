//! API Module
//!
//! HTTP handlers and routing for the admin REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /admin/site`, `GET /admin/cache/stats`
//! - `GET /admin/user`, `PUT /admin/user/update`
//! - `GET /admin/meta`, `PUT /admin/meta/update`
//! - `GET /admin/theme`, `PUT /admin/theme/update`
//! - `GET /admin/projects`, `POST /admin/project/create`,
//!   `GET|PUT|DELETE /admin/project/:slug[/update|/delete]`
//! - `GET /admin/contents`, `POST /admin/content/create`,
//!   `GET|PUT|DELETE /admin/content/:slug[/update|/delete]`
//! - `GET /admin/menu`, `PUT /admin/menu/add`, `PUT /admin/menu/remove`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

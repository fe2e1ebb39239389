//! Records and API models
//!
//! Persisted record types plus the DTOs used for serializing/deserializing
//! HTTP request and response bodies.

mod menu;
mod records;
pub mod requests;
pub mod responses;

pub use menu::Menu;
pub use records::{
    Client, Configuration, Contact, Content, Credentials, Imported, Map, Media, MediaType, Meta,
    Paragraph, Project, Route, Theme, User,
};
pub use requests::{
    ContentRequest, MenuRequest, ProjectRequest, UpdateMetaRequest, UpdateThemeRequest,
    UpdateUserRequest,
};
pub use responses::{
    ContentSummary, HealthResponse, MenuOverview, MutationResponse,
    ProjectSummary, SiteResponse, StatsResponse, ThemeSummary, ThemesResponse,
};

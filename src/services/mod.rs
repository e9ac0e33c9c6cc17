//! Multi-step flows used by the HTML and JSON routes.
//!
//! ARCHITECTURE
//! ============
//! Each function here is a short sequence of [`SiteStore`] calls plus
//! validation, so route handlers can stay focused on form decoding, cookies
//! and rendering.
//!
//! [`SiteStore`]: crate::store::SiteStore

pub mod catalog;
pub mod dashboard;
pub mod feedback;
pub mod landing;

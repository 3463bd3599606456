//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate database and media storage operations.

mod content;

pub use content::{
    ContentService, NewProject, NewProperty, ProjectChanges, PropertyChanges, slugify,
};

//! Operations of [`WayGptClient`](crate::WayGptClient), grouped by endpoint family.
//!
//! - [`chat`]: chat completions, plain and streaming.
//! - [`media`]: image and video generation, media job polling.
//! - [`catalog`]: models, use cases, widget tokens.
//! - [`management`]: the JWT-authenticated Client API for projects and use cases.

pub mod catalog;
pub mod chat;
pub mod management;
pub mod media;

pub use management::{AccessToken, NewUseCase, Project, ProjectSettings, ProjectUpdate, UseCaseKind, UseCaseUpdate};

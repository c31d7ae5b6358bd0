//! Actor System
//!
//! Message-passing concurrency for a live page:
//!
//! ```text
//! FsActor ──PageMsg──► PageActor ──PassReport──► caller
//! (watch)              (owns Document, runs passes)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `page` - Change observer owning the document
//! - `fs` - File system watcher with debouncing (watch mode)
//! - `lightbox` - Startup wiring and the caller-side handle

pub mod fs;
mod lightbox;
pub mod messages;
pub mod page;

pub use lightbox::Lightbox;
pub use messages::{DomEdit, PageMsg, PassReport};

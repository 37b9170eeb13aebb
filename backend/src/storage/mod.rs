//! # Storage Layer
//!
//! Local durable storage for the application state. The state is a single
//! JSON document; backends implement [`StateStorage`] and the
//! [`document`] module turns raw documents into upgraded [`AppData`].
//!
//! [`AppData`]: crate::domain::models::AppData

pub mod document;
pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::StateStorage;

//! File management for the Up2Share API: download tokens, ranged raw
//! downloads, listing, metadata updates and deletion.
//!
//! Like the upload crate this is transport-agnostic; pass an
//! [`ApiClient`](up2share_transport::ApiClient) or any other
//! [`Transport`](up2share_transport::Transport).

pub mod error;
pub mod files;
pub mod types;

pub use error::FilesError;
pub use files::FileHandler;
pub use types::{FileUpdate, Include, ListQuery, RawDownload, SearchJoin};

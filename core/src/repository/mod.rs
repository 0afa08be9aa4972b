pub mod file;
pub mod http;
pub mod traits;

// Re-export
pub use file::FileSource;
pub use http::HttpSource;
pub use traits::SnapshotSource;

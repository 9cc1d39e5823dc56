// Services module for the PawTag backend
// Business logic layer for the application

pub mod pdf;
pub mod profile;
pub mod storage;
pub mod tag_reader;

// Re-export commonly used services
pub use pdf::{passport_filename, passport_pdf};
pub use profile::{pin_allows_edit, ProfileService};
pub use storage::{decode_image_payload, StorageService};
pub use tag_reader::{detect_tag_reader, spawn_tag_listener, NoopTagReader, TagReader};

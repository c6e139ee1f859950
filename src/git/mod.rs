//! Git access: the client trait, its system implementation and settings.

pub mod client;
pub mod settings;
pub mod system;

pub use client::{ChangeSet, GitClient};
pub use settings::GitSettings;
pub use system::SystemGit;

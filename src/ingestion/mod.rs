//! Input loading: CSV roster parsing and required-column checks.

pub mod roster_loader;

pub use roster_loader::RosterLoader;

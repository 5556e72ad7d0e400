pub mod atomic_write;

pub use atomic_write::{write_csv_atomically, WriteError};

//! Core module - configuration and filesystem plumbing

pub mod config;
pub mod inventory;
pub mod selection;

pub use config::Config;
pub use inventory::{discover_batches, inspect_batch, list_images, subfolders, InventoryError};
pub use selection::{sampling_rng, select_sample, SelectionError};

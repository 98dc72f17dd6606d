/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The scan pairing store (pairing.rs)
/// - The logbook export encoding (export.rs)

pub mod data;
pub mod export;
pub mod pairing;

pub use data::{Pair, ScanId, ScanRecord};
pub use pairing::{PairingState, Selection};

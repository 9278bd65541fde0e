//! Per-instance state, value normalization, and action batching.
//!
//! This component owns everything that belongs to exactly one running
//! instance: its view-model root, its document, its callback table and uid
//! counter, and its bundle metadata. On top of that state it provides the
//! two halves of the outbound path: the normalizer (the single choke point
//! that makes values bridge-safe) and the action batcher.

pub mod app;
pub mod batch;
pub mod normalize;

// Re-export main types
pub use app::{AppInstance, BundleMeta, InstanceState, ViewModel};
pub use batch::{flush, submit, submit_one};
pub use normalize::normalize;

//! Asset Reconciler: the lesson asset status state machine.

pub mod service;
pub mod transition;

pub use service::{AssetReconciler, ReconcileOutcome};
pub use transition::plan;

//! Content Store seam for lesson asset records.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryContentStore;
pub use store::ContentStore;

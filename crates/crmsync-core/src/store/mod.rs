// # Contact Store Implementations
//
// This module provides implementations of the ContactStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileContactStore;
pub use memory::MemoryContactStore;

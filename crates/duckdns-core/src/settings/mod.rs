// # Settings Source Implementations
//
// This module provides implementations of the SettingsSource trait for
// different places a UI or operator may keep the updater's settings.

pub mod file;
pub mod memory;

pub use file::FileSettings;
pub use memory::MemorySettings;

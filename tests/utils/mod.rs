pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{MockPublisher, MockSnapshotSource, PublishFailure};
#[allow(unused_imports)]
pub use setup::{officer, player, TestSetup, TestSetupBuilder};

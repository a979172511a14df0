pub mod services;

// Re-export commonly used types at crate root for convenience
pub use services::{
    list_project_files, DiscoveryOptions, FileRecord, ItemReport, MoveOptions, MoveReport,
    MoveService, ScanEntry, ScanService,
};

pub mod codec;
pub mod config;
pub mod error;
pub mod lists;
pub mod registry;

// Re-export main types for convenience
pub use codec::{CodecError, ComplianceMap, ComplianceRegistry, Field};
pub use config::Config;
pub use error::{ComplianceError, Result};
pub use lists::blacklist::{Blacklist, BlacklistEntry};
pub use lists::ofac::{default_ofac_list, OFAC};
pub use lists::ListMetadata;
pub use registry::ComplianceListRegistry;

//! Manifest resolution.
//!
//! Turns author-relative file references into the paths the files will have
//! on the device, copying each file into the staging tree on the way and
//! recording the hash and signer Baseline checks at install time.

mod resolver;
mod stamp;
mod staging;

pub use resolver::Resolver;
pub use stamp::VersionStamp;
pub use staging::{Staging, StagingKind};

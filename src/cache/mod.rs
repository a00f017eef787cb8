//! Persistent cache for forge lookups
//!
//! Resolution results are cached so repeated runs are cheap and stable.
//!
//! # Tiers
//!
//! | Tier | Lifetime | Used for |
//! |------|----------|----------|
//! | memory | one run | contributor lists |
//! | disk | across runs | logins, emails, names, commit identities |
//!
//! Compound values go through [`codec`] so the disk tier stays a flat
//! `string -> string` JSON object.

pub mod codec;
pub mod store;

pub use codec::{deserialize, serialize};
pub use store::{Cache, CACHE_FILE_NAME};

//! mdcredits - markdown contributor lists from git history
//!
//! Collects authors from a repository, resolves each one to a GitHub
//! account (login, email, full name) and writes the list into marked
//! blocks of markdown files.

pub mod author;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod forge;
pub mod generate;
pub mod history;
pub mod render;
pub mod resolve;
pub mod roster;
pub mod similarity;

pub use error::{CreditsError, CreditsResult};

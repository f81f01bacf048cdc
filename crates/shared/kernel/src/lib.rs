//! Runtime plumbing shared by Verity binaries.
//! Keep this crate lightweight; domain rules live in the feature crates.
//!
//! ## Config loading
//! ```rust
//! use verity_kernel::config::load_verity_config;
//!
//! let cfg = load_verity_config(None).unwrap();
//! assert!(cfg.registry.link_handling_default);
//! ```

pub mod config;

pub use verity_domain as domain;

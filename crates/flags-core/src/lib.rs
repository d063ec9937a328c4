//! # Flags-Core: Feature Flag Store for the Media Client
//!
//! This library holds the feature toggles the media client consults while
//! setting up its pipeline and signaling. It is plain configuration plumbing:
//! one write operation, two read predicates and an injected capability check.
//!
//! ## Flags
//!
//! - **Lite mode**: received media is intercepted with insertable streams and
//!   discarded before decode. Only reported as enabled when the runtime can
//!   actually intercept encoded frames.
//! - **SSRC rewriting**: the bridge remaps SSRCs on the media streams, so the
//!   client does not need to track the original mapping itself.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use flags_core::{FeatureFlags, FlagsInit, StaticCapabilities};
//!
//! let flags = Arc::new(FeatureFlags::new(StaticCapabilities::new(true)));
//! flags.init(&FlagsInit::new().with_run_in_lite_mode(true));
//!
//! assert!(flags.is_run_in_lite_mode_enabled());
//! assert!(!flags.is_ssrc_rewriting_supported());
//! ```
//!
//! Loose input, as sent by a client configuration, goes through
//! [`FeatureFlags::init_value`]:
//!
//! ```rust
//! use flags_core::{FeatureFlags, StaticCapabilities};
//! use serde_json::json;
//!
//! let flags = FeatureFlags::new(StaticCapabilities::new(false));
//! flags.init_value(&json!({ "ssrcRewritingEnabled": "yes" }))?;
//! assert!(flags.is_ssrc_rewriting_supported());
//! # Ok::<(), flags_core::FlagsError>(())
//! ```

#![warn(missing_docs)]

pub mod capability;
pub mod config;
pub mod error;
pub mod flags;
pub mod logging;

pub use capability::{CapabilityDetector, ProbeCapabilities, StaticCapabilities};
pub use config::{FlagsInit, is_truthy};
pub use error::{FlagsError, Result};
pub use flags::{FeatureFlags, FlagState, SharedFeatureFlags};

/// Version information for the flags library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

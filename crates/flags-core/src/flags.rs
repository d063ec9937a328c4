//! Feature flag store
//!
//! [`FeatureFlags`] is created once at startup and shared as an
//! [`Arc`] with the components that need it: the media pipeline asks whether
//! to attach frame-discarding transforms, the signaling layer asks whether it
//! can rely on the bridge rewriting SSRCs.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::capability::CapabilityDetector;
use crate::config::FlagsInit;
use crate::error::Result;

/// Flag store shared between components
pub type SharedFeatureFlags = Arc<FeatureFlags>;

/// Stored flag values, before any capability gating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagState {
    /// Lite mode was requested
    pub run_in_lite_mode: bool,
    /// The bridge rewrites SSRCs
    pub ssrc_rewriting_enabled: bool,
}

/// Feature flag store
///
/// Both flags start out `false`. [`init`](Self::init) replaces them as a
/// pair under one write lock, so readers on other threads never see one flag
/// from an old configuration and the other from a new one.
pub struct FeatureFlags {
    state: RwLock<FlagState>,
    capabilities: Arc<dyn CapabilityDetector>,
}

impl FeatureFlags {
    /// Create a store with both flags unset
    pub fn new<D>(capabilities: D) -> Self
    where
        D: CapabilityDetector + 'static,
    {
        Self::with_shared_detector(Arc::new(capabilities))
    }

    /// Create a store around a detector that is already shared elsewhere
    pub fn with_shared_detector(capabilities: Arc<dyn CapabilityDetector>) -> Self {
        Self {
            state: RwLock::new(FlagState::default()),
            capabilities,
        }
    }

    /// Create a store and apply `init` in one step
    pub fn from_init<D>(capabilities: D, init: &FlagsInit) -> Self
    where
        D: CapabilityDetector + 'static,
    {
        let flags = Self::new(capabilities);
        flags.init(init);
        flags
    }

    /// Configure the flags
    ///
    /// Overwrites both flags; options missing from `init` become `false`.
    pub fn init(&self, init: &FlagsInit) {
        let resolved = init.resolve();
        *self.state.write() = resolved;

        debug!(
            "Feature flags initialized: run_in_lite_mode={}, ssrc_rewriting_enabled={}",
            resolved.run_in_lite_mode, resolved.ssrc_rewriting_enabled
        );
        if resolved.run_in_lite_mode && !self.capabilities.supports_insertable_streams() {
            warn!("Lite mode requested but insertable streams are not supported, media will be decoded");
        }
    }

    /// Configure the flags from a loosely typed object
    ///
    /// Fails with [`FlagsError::InvalidConfiguration`](crate::FlagsError::InvalidConfiguration)
    /// when `value` is not an object; the stored flags are left unchanged.
    pub fn init_value(&self, value: &Value) -> Result<()> {
        let init = FlagsInit::from_value(value)?;
        self.init(&init);
        Ok(())
    }

    /// Checks if lite mode is enabled
    ///
    /// Received media is then dropped with insertable streams before it is
    /// decoded. Returns `false` whenever the runtime cannot intercept encoded
    /// frames, since lite mode has no other way to work.
    pub fn is_run_in_lite_mode_enabled(&self) -> bool {
        let requested = self.state.read().run_in_lite_mode;
        if !requested {
            return false;
        }

        let supported = self.capabilities.supports_insertable_streams();
        trace!("Lite mode requested, insertable streams supported: {}", supported);
        supported
    }

    /// Checks if the bridge rewrites SSRCs on the media streams
    pub fn is_ssrc_rewriting_supported(&self) -> bool {
        self.state.read().ssrc_rewriting_enabled
    }

    /// Stored flag values, read together
    pub fn snapshot(&self) -> FlagState {
        *self.state.read()
    }

    /// Wrap the store for sharing
    pub fn into_shared(self) -> SharedFeatureFlags {
        Arc::new(self)
    }
}

impl std::fmt::Debug for FeatureFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureFlags")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{ProbeCapabilities, StaticCapabilities};
    use crate::error::FlagsError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_detector(
        answer: bool,
    ) -> (ProbeCapabilities<impl Fn() -> bool + Send + Sync>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = ProbeCapabilities::new({
            let calls = calls.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                answer
            }
        });
        (probe, calls)
    }

    #[test]
    fn test_defaults_before_init() {
        let flags = FeatureFlags::new(StaticCapabilities::supported());
        assert!(!flags.is_run_in_lite_mode_enabled());
        assert!(!flags.is_ssrc_rewriting_supported());
        assert_eq!(flags.snapshot(), FlagState::default());
    }

    #[test]
    fn test_lite_mode_requires_insertable_streams() {
        let init = FlagsInit::new().with_run_in_lite_mode(true);

        let supported = FeatureFlags::from_init(StaticCapabilities::supported(), &init);
        assert!(supported.is_run_in_lite_mode_enabled());

        let unsupported = FeatureFlags::from_init(StaticCapabilities::unsupported(), &init);
        assert!(!unsupported.is_run_in_lite_mode_enabled());
        assert!(unsupported.snapshot().run_in_lite_mode);
    }

    #[test]
    fn test_capability_not_queried_when_flag_unset() {
        let (probe, calls) = counting_detector(true);
        let flags = FeatureFlags::new(probe);

        assert!(!flags.is_run_in_lite_mode_enabled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        flags.init(&FlagsInit::new().with_run_in_lite_mode(true));
        let after_init = calls.load(Ordering::SeqCst);
        assert!(flags.is_run_in_lite_mode_enabled());
        assert!(flags.is_run_in_lite_mode_enabled());
        assert_eq!(calls.load(Ordering::SeqCst), after_init + 2);
    }

    #[test]
    fn test_ssrc_rewriting_ignores_capabilities() {
        let flags = FeatureFlags::new(StaticCapabilities::unsupported());
        flags.init(&FlagsInit::new().with_ssrc_rewriting_enabled("yes"));
        assert!(flags.is_ssrc_rewriting_supported());
        assert!(!flags.is_run_in_lite_mode_enabled());
    }

    #[test]
    fn test_init_overwrites_without_merging() {
        let flags = FeatureFlags::new(StaticCapabilities::supported());
        flags.init(
            &FlagsInit::new()
                .with_run_in_lite_mode(true)
                .with_ssrc_rewriting_enabled(true),
        );
        flags.init(&FlagsInit::new().with_run_in_lite_mode(true));

        assert!(flags.is_run_in_lite_mode_enabled());
        assert!(!flags.is_ssrc_rewriting_supported());

        flags.init(&FlagsInit::new().with_run_in_lite_mode(false));
        assert!(!flags.is_run_in_lite_mode_enabled());
    }

    #[test]
    fn test_init_value_rejects_null_and_keeps_state() {
        let flags = FeatureFlags::new(StaticCapabilities::supported());
        flags.init_value(&json!({ "ssrcRewritingEnabled": true })).unwrap();

        let err = flags.init_value(&Value::Null).unwrap_err();
        assert!(matches!(err, FlagsError::InvalidConfiguration { found: "null" }));
        assert!(flags.is_ssrc_rewriting_supported());
    }

    #[test]
    fn test_debug_shows_state() {
        let flags = FeatureFlags::new(StaticCapabilities::supported());
        let rendered = format!("{:?}", flags);
        assert!(rendered.contains("run_in_lite_mode: false"));
    }
}

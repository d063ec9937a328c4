//! Runtime capability detection
//!
//! Lite mode discards media by intercepting encoded frames before they reach
//! the decoder. That only works where the runtime exposes insertable streams,
//! so the flag store asks a [`CapabilityDetector`] every time lite mode is
//! queried. Detectors are injected, which lets tests pin the answer.

use std::sync::Arc;

/// Reports what the current runtime environment can do
pub trait CapabilityDetector: Send + Sync {
    /// Whether encoded media frames can be intercepted and transformed before decode
    fn supports_insertable_streams(&self) -> bool;
}

/// Detector with a fixed answer
///
/// Used by hosts whose capabilities are known up front, and by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    /// Whether insertable streams are available
    pub insertable_streams: bool,
}

impl StaticCapabilities {
    /// Create a detector that always answers `insertable_streams`
    pub fn new(insertable_streams: bool) -> Self {
        Self { insertable_streams }
    }

    /// Detector for a runtime with insertable streams
    pub fn supported() -> Self {
        Self::new(true)
    }

    /// Detector for a runtime without insertable streams
    pub fn unsupported() -> Self {
        Self::new(false)
    }
}

impl CapabilityDetector for StaticCapabilities {
    fn supports_insertable_streams(&self) -> bool {
        self.insertable_streams
    }
}

/// Detector backed by a probe function, re-run on every query
pub struct ProbeCapabilities<F> {
    probe: F,
}

impl<F> ProbeCapabilities<F>
where
    F: Fn() -> bool + Send + Sync,
{
    /// Wrap a probe function
    pub fn new(probe: F) -> Self {
        Self { probe }
    }
}

impl<F> CapabilityDetector for ProbeCapabilities<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn supports_insertable_streams(&self) -> bool {
        (self.probe)()
    }
}

impl<F> std::fmt::Debug for ProbeCapabilities<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeCapabilities").finish_non_exhaustive()
    }
}

impl<D: CapabilityDetector + ?Sized> CapabilityDetector for Arc<D> {
    fn supports_insertable_streams(&self) -> bool {
        (**self).supports_insertable_streams()
    }
}

impl<D: CapabilityDetector + ?Sized> CapabilityDetector for Box<D> {
    fn supports_insertable_streams(&self) -> bool {
        (**self).supports_insertable_streams()
    }
}

use std::sync::Arc;

use crate::config::{ConfigError, ProcessSpec};
use crate::params::{ParamChange, ParamStore};

/// Core trait for in-place block effects
///
/// The lifecycle is `prepare` once per stream configuration, then any number
/// of `parameter_changed` / `process` calls from the audio thread.
pub trait Effect: Send {
    /// Parameter storage shared with the control side.
    fn params(&self) -> Arc<ParamStore>;

    /// Allocate every buffer the effect needs for `spec`.
    ///
    /// This is the only call allowed to allocate. It may be called again to
    /// re-configure; all state is rebuilt.
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError>;

    /// Transform one block in place, one slice per output channel.
    ///
    /// Every slice holds the same number of samples, at most the prepared
    /// block size.
    fn process(&mut self, channels: &mut [&mut [f32]]);

    /// A value in `params()` was written.
    ///
    /// Default implementation does nothing (effects that read their
    /// parameters every block).
    fn parameter_changed(&mut self, _change: ParamChange) {
        // Default: do nothing
    }

    /// Silence delay lines, filter and envelope state.
    fn reset(&mut self);

    fn name(&self) -> &'static str;
}

/// Allow boxed effects to be used as effects (for dynamic dispatch)
impl Effect for Box<dyn Effect> {
    fn params(&self) -> Arc<ParamStore> {
        (**self).params()
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError> {
        (**self).prepare(spec)
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        (**self).process(channels)
    }

    fn parameter_changed(&mut self, change: ParamChange) {
        (**self).parameter_changed(change)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

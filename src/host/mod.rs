//! Block-boundary parameter delivery.
//!
//! The control side writes a value into the effect's `ParamStore` and
//! enqueues a `ParamChange`. The audio side drains the queue at the top of
//! each block, forwards every event to `Effect::parameter_changed`, then
//! processes the block. A change therefore lands within one block of being
//! written.
//!
//! If the queue is full the sender raises a resync flag instead of
//! dropping the event silently; the processor answers it with a single
//! `ParamChange::All`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};
#[cfg(feature = "rtrb")]
use tracing::warn;

use crate::config::{ConfigError, ProcessSpec};
use crate::effects::Effect;
use crate::params::{ParamChange, ParamReceiver};
#[cfg(feature = "rtrb")]
use crate::params::ParamStore;

/// Audio-thread side: an effect plus the receiving end of its change queue.
pub struct EffectProcessor<E, R> {
    effect: E,
    rx: R,
    resync: Arc<AtomicBool>,
}

impl<E: Effect, R: ParamReceiver> EffectProcessor<E, R> {
    pub fn new(effect: E, rx: R, resync: Arc<AtomicBool>) -> Self {
        Self { effect, rx, resync }
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    /// Prepare the effect and bring all derived state up to date.
    pub fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError> {
        self.effect.prepare(spec)?;
        self.resync.store(false, Ordering::Release);
        while self.rx.pop().is_some() {}
        self.effect.parameter_changed(ParamChange::All);
        Ok(())
    }

    /// Apply pending parameter changes, then process the block.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        self.apply_pending();
        self.effect.process(channels);
    }

    /// Drain the change queue into the effect.
    pub fn apply_pending(&mut self) {
        if self.resync.swap(false, Ordering::Acquire) {
            // One full redesign covers every queued event.
            while self.rx.pop().is_some() {}
            self.effect.parameter_changed(ParamChange::All);
            return;
        }

        while let Some(change) = self.rx.pop() {
            self.effect.parameter_changed(change);
        }
    }

    pub fn reset(&mut self) {
        self.effect.reset();
    }
}

/// Control side: writes parameter values and announces them.
#[cfg(feature = "rtrb")]
pub struct ParamSender {
    params: Arc<ParamStore>,
    tx: Producer<ParamChange>,
    resync: Arc<AtomicBool>,
}

#[cfg(feature = "rtrb")]
impl ParamSender {
    pub fn params(&self) -> &Arc<ParamStore> {
        &self.params
    }

    /// Store a value and queue a change event. Returns the value as stored,
    /// or `None` if `index` is not a parameter.
    pub fn set(&mut self, index: usize, value: f32) -> Option<f32> {
        let stored = self.params.set(index, value)?;
        self.notify(ParamChange::Changed(index));
        Some(stored)
    }

    pub fn set_by_id(&mut self, id: &str, value: f32) -> Option<f32> {
        let index = self.params.index_of(id)?;
        self.set(index, value)
    }

    /// Ask the audio side to rebuild everything from the store.
    pub fn resync_all(&mut self) {
        self.notify(ParamChange::All);
    }

    fn notify(&mut self, change: ParamChange) {
        if self.tx.push(change).is_err() {
            warn!(?change, "parameter queue full, requesting resync");
            self.resync.store(true, Ordering::Release);
        }
    }
}

/// Split an effect into its audio-side processor and control-side sender,
/// connected by a queue holding `capacity` change events.
#[cfg(feature = "rtrb")]
pub fn channel<E: Effect>(
    effect: E,
    capacity: usize,
) -> (EffectProcessor<E, Consumer<ParamChange>>, ParamSender) {
    let (tx, rx) = RingBuffer::<ParamChange>::new(capacity);
    let resync = Arc::new(AtomicBool::new(false));
    let sender = ParamSender {
        params: effect.params(),
        tx,
        resync: Arc::clone(&resync),
    };

    (EffectProcessor::new(effect, rx, resync), sender)
}

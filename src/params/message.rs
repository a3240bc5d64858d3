#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Notification that one or all parameter values have been written.
///
/// The value itself travels through the `ParamStore`; the message only tells
/// the audio thread which derived state to rebuild.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParamChange {
    Changed(usize),
    All,
}

pub trait ParamReceiver {
    fn pop(&mut self) -> Option<ParamChange>;
}

#[cfg(feature = "rtrb")]
impl ParamReceiver for Consumer<ParamChange> {
    fn pop(&mut self) -> Option<ParamChange> {
        Consumer::pop(self).ok()
    }
}

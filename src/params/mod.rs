//! Shared parameter storage.
//!
//! A `ParamStore` is created by an effect, wrapped in an `Arc` and handed to
//! whoever controls the effect. Control threads write values, the audio
//! thread reads them. Every value lives in its own atomic cell so a read can
//! be stale but never torn.

pub mod message;

use std::sync::atomic::{AtomicU32, Ordering};

pub use message::{ParamChange, ParamReceiver};

/// Lock-free `f32` cell stored as raw bits.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub const fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Continuous value in `[min, max]`.
    Float,
    /// Index into a fixed list of labels, stored as a whole number.
    Choice(&'static [&'static str]),
}

/// Static description of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub id: String,
    pub name: String,
    pub unit: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn float(id: impl Into<String>, name: impl Into<String>, min: f32, max: f32, default: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: "",
            min,
            max,
            default: default.clamp(min, max),
            kind: ParamKind::Float,
        }
    }

    pub fn choice(
        id: impl Into<String>,
        name: impl Into<String>,
        labels: &'static [&'static str],
        default: usize,
    ) -> Self {
        let max = labels.len().saturating_sub(1) as f32;
        Self {
            id: id.into(),
            name: name.into(),
            unit: "",
            min: 0.0,
            max,
            default: (default as f32).min(max),
            kind: ParamKind::Choice(labels),
        }
    }

    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Bring an incoming value into range. NaN falls back to the default and
    /// choices snap to the nearest label.
    pub fn constrain(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let value = value.clamp(self.min, self.max);
        match self.kind {
            ParamKind::Float => value,
            ParamKind::Choice(_) => value.round(),
        }
    }

    /// Human readable value, e.g. `"0.707"`, `"-3.00 dB"` or `"Peaking"`.
    pub fn format(&self, value: f32) -> String {
        match self.kind {
            ParamKind::Choice(labels) => labels
                .get(value.round().max(0.0) as usize)
                .map(|label| label.to_string())
                .unwrap_or_else(|| format!("{}", value)),
            ParamKind::Float if self.unit.is_empty() => format!("{:.3}", value),
            ParamKind::Float => format!("{:.2} {}", value, self.unit),
        }
    }
}

/// Parameter values for one effect instance.
#[derive(Debug)]
pub struct ParamStore {
    specs: Vec<ParamSpec>,
    values: Vec<AtomicF32>,
}

impl ParamStore {
    pub fn new(specs: Vec<ParamSpec>) -> Self {
        let values = specs.iter().map(|spec| AtomicF32::new(spec.default)).collect();
        Self { specs, values }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn spec(&self, index: usize) -> Option<&ParamSpec> {
        self.specs.get(index)
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.id == id)
    }

    /// Current value. Panics if `index` is not a parameter of this store.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.values[index].get()
    }

    /// Current value of a choice parameter as a label index.
    #[inline]
    pub fn choice(&self, index: usize) -> usize {
        self.get(index).round().max(0.0) as usize
    }

    /// Store a value after constraining it to the parameter's range.
    ///
    /// Returns the stored value, or `None` for an unknown index.
    pub fn set(&self, index: usize, value: f32) -> Option<f32> {
        let spec = self.specs.get(index)?;
        let value = spec.constrain(value);
        self.values[index].set(value);
        Some(value)
    }

    pub fn reset_to_defaults(&self) {
        for (spec, cell) in self.specs.iter().zip(&self.values) {
            cell.set(spec.default);
        }
    }
}

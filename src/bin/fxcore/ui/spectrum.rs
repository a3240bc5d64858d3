//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the latest output, sampled at log-spaced
//! frequencies and plotted against log10(frequency).

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of points on the plotted curve
const SPECTRUM_POINTS: usize = 64;
const FLOOR_DB: f64 = -100.0;
const MIN_FREQ_HZ: f32 = 20.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// Sum of the window, used to normalise a full-scale sine to 0 dB
    window_gain: f32,
    /// (log10 frequency, FFT bin) for each plotted point
    points: Vec<(f64, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_len: usize, sample_rate: f32) -> Self {
        let fft_len = fft_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(fft_len);

        let denom = (fft_len - 1) as f32;
        let window: Vec<f32> = (0..fft_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();
        let window_gain = window.iter().sum::<f32>().max(f32::EPSILON);

        let max_freq = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ_HZ * 2.0);
        let last_bin = fft_len / 2 - 1;
        let points: Vec<(f64, usize)> = (0..SPECTRUM_POINTS)
            .map(|i| {
                let t = i as f32 / (SPECTRUM_POINTS - 1) as f32;
                let freq = MIN_FREQ_HZ * (max_freq / MIN_FREQ_HZ).powf(t);
                let bin = ((freq * fft_len as f32 / sample_rate).round() as usize).min(last_bin);
                ((freq as f64).log10(), bin)
            })
            .collect();

        let spectrum = points.iter().map(|&(x, _)| (x, FLOOR_DB)).collect();

        Self {
            window,
            window_gain,
            points,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_len],
            spectrum,
        }
    }

    /// Recompute from the newest `fft_len` samples of `buffer`.
    pub fn update(&mut self, buffer: &[f32]) {
        let len = self.window.len();
        if buffer.len() < len {
            return;
        }
        let recent = &buffer[buffer.len() - len..];

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(recent).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 2.0 / self.window_gain;
        for (point, &(_, bin)) in self.spectrum.iter_mut().zip(&self.points) {
            let magnitude = (self.scratch[bin].norm() * scale).max(1e-9);
            point.1 = (20.0 * (magnitude as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let x_min = spectrum.first().map_or(1.0, |p| p.0);
    let x_max = spectrum.last().map_or(4.3, |p| p.0);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 6.0])
                .labels(vec!["-100", "-48", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

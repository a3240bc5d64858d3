//! TUI module for fxcore
//!
//! Shows the processed output and lets the user edit the effect's
//! parameters while it plays.

mod params;
mod spectrum;
mod waveform;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use fxcore::host::ParamSender;
use fxcore::params::ParamKind;

use crate::effects::EffectKind;
use params::render_params;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// Steps across a float parameter's range per key press
const COARSE_STEPS: f32 = 50.0;
const FINE_STEPS: f32 = 500.0;

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for processed samples
    audio_rx: Consumer<f32>,
    /// Control side of the effect's parameters
    sender: ParamSender,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    kind: EffectKind,
    /// Highlighted parameter
    selected: usize,
    should_quit: bool,
}

impl UiApp {
    pub fn new(audio_rx: Consumer<f32>, sender: ParamSender, sample_rate: f32, kind: EffectKind) -> Self {
        Self {
            audio_rx,
            sender,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            kind,
            selected: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let fine = key.modifiers.contains(KeyModifiers::SHIFT);
                        self.handle_key(key.code, fine);
                    }
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }

        for _ in 0..available {
            if let Ok(sample) = self.audio_rx.pop() {
                self.audio_buffer.push(sample);
            }
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode, fine: bool) {
        let count = self.sender.params().len();

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(count.saturating_sub(1));
            }
            KeyCode::Down => {
                self.selected = if self.selected + 1 >= count { 0 } else { self.selected + 1 };
            }
            KeyCode::Left => self.nudge(-1.0, fine),
            KeyCode::Right => self.nudge(1.0, fine),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.sender.params().reset_to_defaults();
                self.sender.resync_all();
            }
            _ => {}
        }
    }

    /// Move the selected parameter one step in `direction`.
    fn nudge(&mut self, direction: f32, fine: bool) {
        let params = self.sender.params();
        let Some(spec) = params.spec(self.selected) else {
            return;
        };

        let step = match spec.kind {
            ParamKind::Choice(_) => 1.0,
            ParamKind::Float => {
                let steps = if fine { FINE_STEPS } else { COARSE_STEPS };
                (spec.max - spec.min) / steps
            }
        };
        let value = params.get(self.selected) + direction * step;
        self.sender.set(self.selected, value);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let param_rows = self.sender.params().len() as u16 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(param_rows), // Parameters
                Constraint::Min(6),             // Waveform
                Constraint::Length(10),         // Spectrum
                Constraint::Length(1),          // Help bar
            ])
            .split(area);

        render_params(frame, chunks[0], self.sender.params(), self.selected, self.kind);
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data());

        let help = Paragraph::new(" [Q] Quit  [Up/Down] Select  [Left/Right] Adjust (Shift: fine)  [R] Defaults")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

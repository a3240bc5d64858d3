//! Parameter list widget

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use fxcore::params::ParamStore;

use crate::effects::EffectKind;

/// Width of the value gauge in cells
const GAUGE_WIDTH: usize = 24;

/// Render one row per parameter: name, gauge, formatted value
pub fn render_params(
    frame: &mut Frame,
    area: Rect,
    params: &ParamStore,
    selected: usize,
    kind: EffectKind,
) {
    let block = Block::default()
        .title(format!(" {:?} ", kind))
        .borders(Borders::ALL);

    let lines: Vec<Line> = params
        .specs()
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let value = params.get(i);
            let range = (spec.max - spec.min).max(f32::EPSILON);
            let filled = (((value - spec.min) / range) * GAUGE_WIDTH as f32).round() as usize;
            let filled = filled.min(GAUGE_WIDTH);
            let gauge = format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled));

            let style = if i == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if i == selected { "> " } else { "  " };

            Line::from(vec![
                Span::styled(format!("{}{:<20}", marker, spec.name), style),
                Span::styled(gauge, Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {}", spec.format(value)), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

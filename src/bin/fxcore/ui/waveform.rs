//! Output oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use fxcore::dsp::dynamics::linear_to_db;

/// Plot the buffer against sample index, with the peak level in the title.
/// Samples over full scale turn the trace red.
pub fn render_waveform(frame: &mut Frame, area: Rect, samples: &[f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    let peak_db = linear_to_db(peak);

    let block = Block::default()
        .title(format!(" Output  peak {:>6.1} dB ", peak_db))
        .borders(Borders::ALL);

    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64, s as f64))
        .collect();

    let colour = if peak > 1.0 { Color::Red } else { Color::Cyan };
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colour))
        .data(&data);

    let y_limit = (peak as f64).max(1.0);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, samples.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-y_limit, y_limit])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

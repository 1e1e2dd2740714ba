//! ABP line chart rendered into a ratatui terminal.

use crate::locale::Locale;
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};
use std::io;

pub fn points(series: &[f64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// X bounds for a series; a single sample is centred on `[-1, 1]`.
pub fn x_bounds(len: usize) -> [f64; 2] {
    if len <= 1 {
        [-1.0, 1.0]
    } else {
        [0.0, (len - 1) as f64]
    }
}

pub fn y_bounds(series: &[f64]) -> [f64; 2] {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.1).max(1.0);
    [min - pad, max + pad]
}

/// Builds the chart; a single sample is drawn as one marked point.
pub fn abp_chart<'a>(data: &'a [(f64, f64)], locale: Locale) -> Chart<'a> {
    let series: Vec<f64> = data.iter().map(|&(_, y)| y).collect();
    let [x_min, x_max] = x_bounds(data.len());
    let [y_min, y_max] = y_bounds(&series);

    let dataset = if data.len() == 1 {
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
    } else {
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
    }
    .name("ABP")
    .style(Style::default().fg(Color::Magenta))
    .data(data);

    Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", locale.chart_title())),
        )
        .x_axis(
            Axis::default()
                .title(locale.x_label())
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{}", x_min)),
                    Span::raw(format!("{}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(locale.y_label())
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.1}", y_min)),
                    Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.1}", y_max)),
                ]),
        )
}

pub fn draw<B: Backend>(terminal: &mut Terminal<B>, series: &[f64], locale: Locale) -> io::Result<()> {
    let data = points(series);
    terminal.draw(|frame| {
        let chart = abp_chart(&data, locale);
        frame.render_widget(chart, frame.area());
    })?;
    Ok(())
}

//! Human-readable output using rich_rust.

use rich_rust::prelude::*;
use rich_rust::{Color, ColorSystem, Segment, Style};

use crate::core::models::{LookupPayload, NormalizedAddress};

const PANEL_WIDTH: usize = 60;

/// Convert segments to a string, with ANSI styling unless `no_color`.
pub(crate) fn segments_to_string(segments: &[Segment], no_color: bool) -> String {
    let color_system = if no_color {
        ColorSystem::Standard
    } else {
        ColorSystem::TrueColor
    };

    segments
        .iter()
        .map(|seg| match (&seg.style, no_color) {
            (Some(style), false) => style.render(&seg.text, color_system),
            _ => seg.text.to_string(),
        })
        .collect()
}

/// A style with the named color, or a plain style if the name is unknown.
fn colored(name: &str) -> Style {
    Color::parse(name).map_or_else(|_| Style::new(), |color| Style::new().color(color))
}

/// Render a lookup result for a terminal.
#[must_use]
pub fn render_lookup(payload: &LookupPayload, no_color: bool) -> String {
    match &payload.address {
        Some(address) => render_address(address, no_color),
        None => render_timeout(payload.deadline_ms, no_color),
    }
}

fn render_address(address: &NormalizedAddress, no_color: bool) -> String {
    let rows = [
        ("CEP", address.postal_code()),
        ("State", address.region()),
        ("City", address.city()),
        ("Neighborhood", address.district()),
        ("Street", address.street()),
    ];

    let content_lines: Vec<Vec<Segment>> = rows
        .iter()
        .map(|(label, value)| field_segments(label, value, no_color))
        .collect();

    let title_text = format!("Answer from {}", address.source);
    let title = if no_color {
        Text::new(&title_text)
    } else {
        Text::styled(&title_text, colored("cyan").bold())
    };

    let mut panel = Panel::new(content_lines).title(title).padding((0, 1));
    if !no_color {
        panel = panel.border_style(colored("blue"));
    }

    let segments = panel.render(PANEL_WIDTH);
    segments_to_string(&segments, no_color)
}

fn field_segments(label: &str, value: &str, no_color: bool) -> Vec<Segment<'static>> {
    let label_style = if no_color {
        Style::new()
    } else {
        Style::new().bold()
    };
    let mut segments = vec![Segment::styled(format!("{label:<13}"), label_style)];

    if value.is_empty() {
        let style = if no_color { Style::new() } else { Style::new().dim() };
        segments.push(Segment::styled("-".to_string(), style));
    } else {
        segments.push(Segment::plain(value.to_string()));
    }

    segments
}

fn render_timeout(deadline_ms: u64, no_color: bool) -> String {
    let style = if no_color {
        Style::new()
    } else {
        colored("yellow").bold()
    };
    let segments = vec![
        Segment::styled("Timeout".to_string(), style),
        Segment::plain(format!(": no source answered within {deadline_ms}ms")),
    ];
    segments_to_string(&segments, no_color)
}

//! Canvas view of the drifting point cloud.

use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders,
    },
    Frame,
};

use crate::state::CloudState;
use crate::themes::Theme;

/// Half the width and height of the visible plane.
pub const VIEW_EXTENT: f64 = 2.0;

/// Projected points that fall inside the visible plane.
pub fn visible_points(points: &[(f64, f64)]) -> usize {
    points
        .iter()
        .filter(|(x, y)| x.abs() <= VIEW_EXTENT && y.abs() <= VIEW_EXTENT)
        .count()
}

/// Draw the projected cloud with its step count and run state in the title.
pub fn render_cloud(frame: &mut Frame, area: Rect, state: &CloudState, theme: &Theme) {
    let points = state.cloud.project();
    let title = format!(
        " {}D point cloud · step {} · {} of {} in view · {} ",
        state.cloud.dimensions(),
        state.cloud.steps(),
        visible_points(&points),
        points.len(),
        if state.running { "running" } else { "stopped" }
    );
    let color = theme.series.fg.unwrap_or(Color::White);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([-VIEW_EXTENT, VIEW_EXTENT])
        .y_bounds([-VIEW_EXTENT, VIEW_EXTENT])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &points,
                color,
            });
        });
    frame.render_widget(canvas, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

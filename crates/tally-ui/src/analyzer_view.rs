//! Monthly email chart for the analyzer tool.
//!
//! Renders the gap-filled monthly series either as a line chart (counts,
//! a flat average line and an optional moving-average trend) or as a bar
//! chart with above-average months highlighted. Regenerating replaces the
//! previous chart because the view is drawn from state on every frame.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use tally_core::formatting::{format_count, format_decimal};
use tally_core::models::MonthlySeries;
use tally_data::EmailReport;

use crate::state::{AnalyzerDisplay, AnalyzerState, ChartStyle};
use crate::themes::Theme;

/// Headroom added above the tallest value on the vertical axis.
pub const Y_HEADROOM: f64 = 5.0;

/// Maximum number of month labels drawn under the line chart.
const MAX_X_LABELS: usize = 7;

/// Columns taken by a month label such as `"Jan 2023"`.
const LABEL_WIDTH: usize = 8;

/// Widest bar drawn, and the blank column between bars.
const MAX_BAR_WIDTH: u16 = 9;
const BAR_GAP: u16 = 1;

const TITLE: &str = " Email Frequency by Month ";
const BARS_FALLBACK_TITLE: &str =
    " Email Frequency by Month · too many months for bars, showing lines ";

/// Vertical-axis upper bound: `max(max count, average) + 5`.
pub fn y_upper_bound(series: &MonthlySeries) -> f64 {
    (series.max_count() as f64).max(series.average) + Y_HEADROOM
}

/// Evenly spaced bucket indices to label, always including both ends.
pub fn label_indices(len: usize, max_labels: usize) -> Vec<usize> {
    if len == 0 || max_labels == 0 {
        return Vec::new();
    }
    let count = len.min(max_labels.max(2));
    if count == 1 {
        return vec![0];
    }
    let span = (len - 1) as f64;
    let mut indices: Vec<usize> = (0..count)
        .map(|j| (j as f64 * span / (count - 1) as f64).round() as usize)
        .collect();
    indices.dedup();
    indices
}

/// Bar width that fits `months` bars in a chart `width` columns wide
/// (borders included), or `None` when even one-column bars would not fit.
pub fn bar_width(months: usize, width: u16) -> Option<u16> {
    if months == 0 {
        return None;
    }
    let inner = width.saturating_sub(2) as usize;
    let slot = (inner + BAR_GAP as usize) / months;
    if slot < 1 + BAR_GAP as usize {
        return None;
    }
    Some((slot as u16 - BAR_GAP).min(MAX_BAR_WIDTH))
}

/// Month labels laid out under bars spaced `step` columns apart.
///
/// Labels keep their full text; only months from [`label_indices`] that do
/// not collide with a neighbour are written. The last month always wins a
/// collision so both ends of the range stay visible.
pub fn month_label_row(series: &MonthlySeries, step: usize, width: usize) -> String {
    let n = series.len();
    let mut row = vec![' '; width];
    if n == 0 || step == 0 || width < LABEL_WIDTH {
        return row.into_iter().collect();
    }

    let min_gap = (LABEL_WIDTH + 1).div_ceil(step);
    let max_labels = (n - 1) / min_gap + 1;
    let indices = label_indices(n, max_labels);
    let last = n - 1;

    let mut placed: Vec<(usize, String)> = Vec::new();
    for i in indices {
        let label = series.buckets[i].key.label();
        let start = (i * step).min(width.saturating_sub(label.len()));
        let collides = |placed: &[(usize, String)]| {
            placed
                .last()
                .is_some_and(|(prev, _)| prev + LABEL_WIDTH >= start)
        };
        if i == last {
            while collides(&placed) {
                placed.pop();
            }
        } else if collides(&placed) {
            continue;
        }
        placed.push((start, label));
    }

    for (start, label) in placed {
        for (offset, ch) in label.chars().enumerate() {
            if let Some(cell) = row.get_mut(start + offset) {
                *cell = ch;
            }
        }
    }
    row.into_iter().collect()
}

/// Draw the analyzer body for the current state.
pub fn render_analyzer(frame: &mut Frame, area: Rect, state: &AnalyzerState, theme: &Theme) {
    match &state.display {
        AnalyzerDisplay::Idle => render_idle(frame, area, state, theme),
        AnalyzerDisplay::NoData { records, skipped } => {
            render_no_data(frame, area, *records, *skipped, theme)
        }
        AnalyzerDisplay::Chart(report) => {
            let [chart_area, summary_area] =
                Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);
            match state.chart_style {
                ChartStyle::Line => {
                    let trend = state.trend();
                    render_line_chart(frame, chart_area, &report.series, trend.as_deref(), theme);
                }
                ChartStyle::Bar => render_bar_chart(frame, chart_area, &report.series, theme),
            }
            frame.render_widget(Paragraph::new(summary_line(report, theme)), summary_area);
        }
    }
}

/// Line chart: monthly counts, average and optional trend.
pub fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    series: &MonthlySeries,
    trend: Option<&[f64]>,
    theme: &Theme,
) {
    draw_line_chart(frame, area, series, trend, TITLE, theme);
}

fn draw_line_chart(
    frame: &mut Frame,
    area: Rect,
    series: &MonthlySeries,
    trend: Option<&[f64]>,
    title: &str,
    theme: &Theme,
) {
    let n = series.len();
    let x_max = n.saturating_sub(1).max(1) as f64;

    let counts: Vec<(f64, f64)> = series
        .buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.count as f64))
        .collect();
    let average = [(0.0, series.average), (x_max, series.average)];
    let trend_points: Vec<(f64, f64)> = trend
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let mut datasets = vec![
        Dataset::default()
            .name("Emails per month")
            .marker(Marker::Braille)
            .graph_type(if n == 1 {
                GraphType::Scatter
            } else {
                GraphType::Line
            })
            .style(theme.series)
            .data(&counts),
        Dataset::default()
            .name(format!("Average ({})", format_decimal(series.average, 2)))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.average)
            .data(&average),
    ];
    if n > 1 && !trend_points.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Trend")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.trend)
                .data(&trend_points),
        );
    }

    let x_labels: Vec<Span> = if n == 1 {
        vec![
            Span::styled(series.buckets[0].key.label(), theme.axis),
            Span::raw(""),
        ]
    } else {
        label_indices(n, MAX_X_LABELS)
            .into_iter()
            .map(|i| Span::styled(series.buckets[i].key.label(), theme.axis))
            .collect()
    };

    let y_max = y_upper_bound(series);
    let y_labels: Vec<Span> = [0.0, y_max / 2.0, y_max]
        .iter()
        .map(|v| Span::styled(format_decimal(*v, 0), theme.axis))
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Month")
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Emails")
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

/// Bar chart: one bar per month, average in the title.
///
/// Falls back to the line chart, with a note in the title, when the area
/// is too narrow to give every month its own bar.
pub fn render_bar_chart(frame: &mut Frame, area: Rect, series: &MonthlySeries, theme: &Theme) {
    let Some(bar_width) = bar_width(series.len(), area.width) else {
        draw_line_chart(frame, area, series, None, BARS_FALLBACK_TITLE, theme);
        return;
    };

    let block = Block::default().borders(Borders::ALL).title(format!(
        " Email Frequency by Month · average {}/month ",
        format_decimal(series.average, 2)
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [bars_area, labels_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let bars: Vec<Bar> = series
        .buckets
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.count)
                .style(theme.bar_style(b.count, series.average))
                .value_style(theme.bold)
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .max(y_upper_bound(series).ceil() as u64);
    frame.render_widget(chart, bars_area);

    let labels = month_label_row(
        series,
        (bar_width + BAR_GAP) as usize,
        labels_area.width as usize,
    );
    frame.render_widget(Paragraph::new(Span::styled(labels, theme.axis)), labels_area);
}

/// Placeholder shown when the last run found no usable dates.
pub fn render_no_data(frame: &mut Frame, area: Rect, records: usize, skipped: usize, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data to display", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} records read, {} skipped without a usable Date header.",
                format_count(records as u64),
                format_count(skipped as u64)
            ),
            theme.dim,
        )),
        Line::from(Span::styled(
            "Press 's' to choose another file.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default().borders(Borders::ALL).title(TITLE),
        ),
        area,
    );
}

fn render_idle(frame: &mut Frame, area: Rect, state: &AnalyzerState, theme: &Theme) {
    let selected = match state.selected_name() {
        Some(name) => Line::from(vec![
            Span::styled("Selected file: ", theme.label),
            Span::styled(name, theme.value),
        ]),
        None => Line::from(Span::styled("No file selected", theme.dim)),
    };
    let text = vec![
        Line::from(""),
        selected,
        Line::from(""),
        Line::from(Span::styled(
            "Press 's' to select an email text file, then 'g' to generate the graph.",
            theme.info,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default().borders(Borders::ALL).title(TITLE),
        ),
        area,
    );
}

fn summary_line<'a>(report: &EmailReport, theme: &'a Theme) -> Line<'a> {
    let series = &report.series;
    let range = match (series.first_month(), series.last_month()) {
        (Some(first), Some(last)) if first != last => format!("{first} – {last}"),
        (Some(first), _) => first.to_string(),
        _ => String::new(),
    };
    Line::from(vec![
        Span::styled(format_count(series.total), theme.value),
        Span::styled(" emails over ", theme.label),
        Span::styled(series.len().to_string(), theme.value),
        Span::styled(" months (", theme.label),
        Span::styled(range, theme.value),
        Span::styled(")  average ", theme.label),
        Span::styled(format_decimal(series.average, 2), theme.average),
        Span::styled("  skipped ", theme.label),
        Span::styled(
            format!(
                "{} of {} records",
                format_count(report.skipped() as u64),
                format_count(report.records() as u64)
            ),
            theme.warning,
        ),
    ])
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tally_core::models::{MonthBucket, MonthKey};
    use tally_data::analyze_text;

    fn series(counts: &[u64]) -> MonthlySeries {
        let mut key = MonthKey::new(2023, 1).unwrap();
        let mut buckets = Vec::new();
        for &count in counts {
            buckets.push(MonthBucket { key, count });
            key = key.succ();
        }
        let total: u64 = counts.iter().sum();
        MonthlySeries {
            average: total as f64 / counts.len().max(1) as f64,
            buckets,
            total,
        }
    }

    fn draw(width: u16, height: u16, f: impl FnOnce(&mut Frame)) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(f).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn chart_state(text: &str) -> AnalyzerState {
        let mut state = AnalyzerState::new(3);
        state.display = AnalyzerDisplay::Chart(analyze_text(text).unwrap());
        state
    }

    #[test]
    fn test_y_upper_bound_uses_max_and_headroom() {
        assert_eq!(y_upper_bound(&series(&[2, 10, 3])), 15.0);
        assert_eq!(y_upper_bound(&MonthlySeries::default()), 5.0);
    }

    #[test]
    fn test_label_indices() {
        assert_eq!(label_indices(0, 7), Vec::<usize>::new());
        assert_eq!(label_indices(1, 7), vec![0]);
        assert_eq!(label_indices(4, 7), vec![0, 1, 2, 3]);
        let many = label_indices(25, 7);
        assert_eq!(many.len(), 7);
        assert_eq!(many[0], 0);
        assert_eq!(*many.last().unwrap(), 24);
    }

    #[test]
    fn test_render_line_chart_shows_months() {
        let s = series(&[1, 0, 0, 4]);
        let theme = Theme::dark();
        let content = draw(100, 24, |frame| {
            let area = frame.area();
            render_line_chart(frame, area, &s, Some(&s.moving_average(3)), &theme);
        });
        assert!(content.contains("Email Frequency by Month"));
        assert!(content.contains("Jan 2023"));
        assert!(content.contains("Apr 2023"));
    }

    #[test]
    fn test_render_line_chart_single_month_does_not_panic() {
        let s = series(&[3]);
        let theme = Theme::light();
        let content = draw(80, 20, |frame| {
            let area = frame.area();
            render_line_chart(frame, area, &s, None, &theme);
        });
        assert!(content.contains("Jan 2023"));
    }

    #[test]
    fn test_render_bar_chart_shows_average_in_title() {
        let s = series(&[2, 6]);
        let theme = Theme::dark();
        let content = draw(80, 20, |frame| {
            let area = frame.area();
            render_bar_chart(frame, area, &s, &theme);
        });
        assert!(content.contains("average 4.00/month"));
    }

    #[test]
    fn test_render_bar_chart_many_months_falls_back_to_lines() {
        let s = series(&[1; 60]);
        let theme = Theme::classic();
        let content = draw(40, 12, |frame| {
            let area = frame.area();
            render_bar_chart(frame, area, &s, &theme);
        });
        assert!(content.contains("Email Frequency by Month"));
        assert!(!content.contains("average 1.00/month"));
    }

    #[test]
    fn test_render_bar_chart_four_years_at_80_columns_keeps_every_month() {
        let counts: Vec<u64> = (0..48).map(|i| i % 5 + 1).collect();
        let s = series(&counts);
        assert_eq!(bar_width(48, 80), None);
        let theme = Theme::dark();
        let content = draw(80, 20, |frame| {
            let area = frame.area();
            render_bar_chart(frame, area, &s, &theme);
        });
        assert!(content.contains("too many months for bars"));
        assert!(content.contains("Jan 2023"));
        assert!(content.contains("Dec 2026"));
    }

    #[test]
    fn test_render_bar_chart_labels_use_full_month_text() {
        let s = series(&[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8]);
        let theme = Theme::dark();
        let content = draw(80, 20, |frame| {
            let area = frame.area();
            render_bar_chart(frame, area, &s, &theme);
        });
        assert!(content.contains("average 4.33/month"));
        assert!(content.contains("Jan 2023"));
        assert!(content.contains("Dec 2023"));
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(0, 80), None);
        assert_eq!(bar_width(2, 80), Some(9));
        assert_eq!(bar_width(12, 80), Some(5));
        assert_eq!(bar_width(39, 80), Some(1));
        assert_eq!(bar_width(40, 80), None);
    }

    #[test]
    fn test_month_label_row() {
        let s = series(&[1, 2, 3]);
        assert_eq!(
            month_label_row(&s, 9, 30).trim_end(),
            "Jan 2023 Feb 2023 Mar 2023"
        );

        // Narrow bars: labels are thinned but never cut, and both ends stay.
        let s = series(&[1; 12]);
        let row = month_label_row(&s, 2, 24);
        assert_eq!(row.chars().count(), 24);
        assert!(row.starts_with("Jan 2023"));
        assert!(row.ends_with("Dec 2023"));
        assert!(!row.contains(" J "));
    }

    #[test]
    fn test_render_no_data() {
        let theme = Theme::dark();
        let content = draw(80, 12, |frame| {
            let area = frame.area();
            render_no_data(frame, area, 3, 3, &theme);
        });
        assert!(content.contains("No data to display"));
        assert!(content.contains("3 skipped"));
    }

    #[test]
    fn test_render_analyzer_idle_and_chart() {
        let theme = Theme::dark();
        let idle = AnalyzerState::new(3);
        let content = draw(100, 20, |frame| {
            let area = frame.area();
            render_analyzer(frame, area, &idle, &theme);
        });
        assert!(content.contains("No file selected"));

        let mut state = chart_state("Date: 1 Jan 2023\n\nDate: 2 Jan 2023\n\nnothing\n");
        for style in [ChartStyle::Line, ChartStyle::Bar] {
            state.chart_style = style;
            let content = draw(100, 20, |frame| {
                let area = frame.area();
                render_analyzer(frame, area, &state, &theme);
            });
            assert!(content.contains("skipped 1 of 3 records"), "{style:?}");
        }
    }
}

//! Input form, configuration table and measurement chart for the quantum demo.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use tally_core::formatting::{format_complex, format_count, format_decimal, format_probability};
use tally_core::InputField;
use tally_quantum::{MeasurementTally, QuantumBox};

use crate::state::QuantumState;
use crate::themes::Theme;

const FIELDS: [(InputField, &str, &str); 3] = [
    (
        InputField::States,
        "States",
        "comma-separated labels, e.g. Alive,Dead",
    ),
    (
        InputField::Amplitudes,
        "Amplitudes",
        "real or complex, e.g. 1, 0.5+0.5j",
    ),
    (InputField::Trials, "Trials", "number of measurements"),
];

/// Draw the whole quantum tool body.
pub fn render_quantum(frame: &mut Frame, area: Rect, state: &QuantumState, theme: &Theme) {
    let [left, right] =
        Layout::horizontal([Constraint::Length(52), Constraint::Min(20)]).areas(area);

    let config_rows = state.config.as_ref().map_or(1, QuantumBox::len) as u16;
    let [inputs_area, config_area, last_area] = Layout::vertical([
        Constraint::Length(11),
        Constraint::Length(config_rows + 4),
        Constraint::Min(3),
    ])
    .areas(left);

    frame.render_widget(input_form(state, theme), inputs_area);
    render_configuration(frame, config_area, state.config.as_ref(), theme);
    frame.render_widget(last_measurement(state, theme), last_area);

    match &state.tally {
        Some(tally) => render_simulation(frame, right, tally, theme),
        None => {
            let hint = if state.is_configured() {
                "Press Ctrl+R to simulate many trials."
            } else {
                "Set a box configuration first (Enter on States or Amplitudes)."
            };
            frame.render_widget(
                Paragraph::new(Text::from(vec![
                    Line::from(""),
                    Line::from(Span::styled(hint, theme.dim)),
                ]))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Simulation Results "),
                ),
                right,
            );
        }
    }
}

/// The three labelled fields, each followed by its inline error or hint.
fn input_form<'a>(state: &'a QuantumState, theme: &'a Theme) -> Paragraph<'a> {
    let mut lines = Vec::new();
    for (field, label, hint) in FIELDS {
        let focused = state.focus == field;
        let error = state.error_for(field);
        let marker = if focused { "▶ " } else { "  " };
        let cursor = if focused { "▏" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(marker, theme.input_focused),
            Span::styled(format!("{label:<11}"), theme.label),
            Span::styled(state.input(field), theme.input_style(focused, error.is_some())),
            Span::styled(cursor, theme.input_focused),
        ]));
        lines.push(match error {
            Some(message) => Line::from(Span::styled(format!("    {message}"), theme.error)),
            None => Line::from(Span::styled(format!("    {hint}"), theme.dim)),
        });
        lines.push(Line::from(""));
    }

    Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Box Configuration "),
    )
}

/// Per-state normalised amplitude and probability plus the total.
pub fn render_configuration(
    frame: &mut Frame,
    area: Rect,
    config: Option<&QuantumBox>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Current Configuration ");

    let Some(config) = config else {
        frame.render_widget(
            Paragraph::new(Span::styled("Not configured", theme.dim)).block(block),
            area,
        );
        return;
    };

    let header = Row::new(
        ["State", "Amplitude", "Probability"]
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    );
    let mut rows: Vec<Row> = config
        .configuration()
        .into_iter()
        .enumerate()
        .map(|(i, info)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(info.label),
                Cell::from(format_complex(info.amplitude.re, info.amplitude.im, 3)),
                Cell::from(format_probability(info.probability)),
            ])
            .style(style)
        })
        .collect();
    let total: f64 = config.probabilities().iter().sum();
    rows.push(
        Row::new(vec![
            Cell::from("Total"),
            Cell::from(""),
            Cell::from(format_probability(total)),
        ])
        .style(theme.table_total),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block);
    frame.render_widget(table, area);
}

fn last_measurement<'a>(state: &'a QuantumState, theme: &'a Theme) -> Paragraph<'a> {
    let result = match &state.last_measurement {
        Some(label) => Span::styled(label.as_str(), theme.success),
        None => Span::styled("-", theme.dim),
    };
    Paragraph::new(Line::from(vec![
        Span::styled("Last Measurement Result: ", theme.label),
        result,
    ]))
    .block(Block::default().borders(Borders::ALL))
}

/// Grouped bars (observed vs expected) above a frequency table.
pub fn render_simulation(frame: &mut Frame, area: Rect, tally: &MeasurementTally, theme: &Theme) {
    let table_height = tally.states().len() as u16 + 3;
    let [chart_area, table_area] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(table_height)]).areas(area);

    let groups: Vec<BarGroup> = tally
        .rows()
        .into_iter()
        .map(|row| {
            let expected = row.expected.round() as u64;
            BarGroup::default()
                .label(Line::from(row.label.to_string()))
                .bars(&[
                    Bar::default()
                        .value(row.count)
                        .text_value(format_count(row.count))
                        .style(theme.observed),
                    Bar::default()
                        .value(expected)
                        .text_value(format_count(expected))
                        .style(theme.expected),
                ])
        })
        .collect();

    let mut chart = BarChart::default()
        .block(
            Block::default().borders(Borders::ALL).title(Line::from(vec![
                Span::raw(format!(" {} trials  ", format_count(tally.trials()))),
                Span::styled("■ observed", theme.observed),
                Span::raw("  "),
                Span::styled("■ expected ", theme.expected),
            ])),
        )
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .max((tally.max_count() * 1.1).ceil() as u64);
    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, chart_area);

    let header = Row::new(
        ["State", "Observed", "Expected", "Frequency", "Probability"]
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    );
    let rows: Vec<Row> = tally
        .rows()
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.label.to_string()),
                Cell::from(format_count(row.count)),
                Cell::from(format_decimal(row.expected, 1)),
                Cell::from(format_probability(row.observed)),
                Cell::from(format_probability(row.probability)),
            ])
            .style(theme.table_row)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Observed vs Theoretical "),
    );
    frame.render_widget(table, table_area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! UI Rendering
//!
//! Layout, top to bottom: header, query input, status line (loading / error),
//! result cards, shortcut bar.

use crate::models::MaterialRecord;
use crate::tui::app::{App, Screen};
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Rows not available to the results list (header, input, status, shortcuts, results border)
pub const CHROME_HEIGHT: u16 = 3 + 3 + 1 + 1 + 2;

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status
            Constraint::Min(4),    // Results
            Constraint::Length(1), // Shortcuts
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_input(frame, chunks[1], app);
    render_status(frame, chunks[2], app);
    render_results(frame, chunks[3], app);
    render_shortcuts(frame, chunks[4], app);

    if app.screen == Screen::Help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled("Search Material Data", Theme::title()),
        Span::styled("  Materials Project oxidation states", Theme::text_secondary()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let button = if app.search.loading {
        Span::styled(" Loading... ", Theme::active())
    } else {
        Span::styled(" Search ", Theme::shortcut_key())
    };

    let block = Block::default()
        .title(" Formula ")
        .title_bottom(Line::from(button).right_aligned())
        .borders(Borders::ALL)
        .border_style(if app.screen == Screen::Search {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.input, inner);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.search.loading {
        Line::from(Span::styled(
            format!("{} Searching...", Icons::ACTIVE),
            Theme::active(),
        ))
    } else if app.search.has_error() {
        Line::from(Span::styled(
            format!("{} {}", Icons::ERROR, app.search.error),
            Theme::error(),
        ))
    } else if !app.search.results.is_empty() {
        Line::from(Span::styled(
            format!("{} {} result(s)", Icons::COMPLETE, app.search.results.len()),
            Theme::complete(),
        ))
    } else {
        Line::from(Span::styled("Ready", Theme::text_secondary()))
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Results: ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.search.results.is_empty() {
        return;
    }

    let paragraph = Paragraph::new(result_lines(&app.search.results)).scroll((app.scroll_offset, 0));
    frame.render_widget(paragraph, inner);
}

/// One card per record, separated by blank lines
pub fn result_lines(records: &[MaterialRecord]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for record in records {
        lines.push(Line::from(Span::styled(
            record.formula_pretty.clone(),
            Theme::title(),
        )));
        lines.push(field("Material ID", record.material_id.clone()));
        lines.push(field("Density", format!("{} g/cm³", record.density)));
        lines.push(field("Volume", format!("{} Å³", record.volume)));
        lines.push(field(
            "Symmetry",
            format!(
                "{} ({})",
                record.symmetry.crystal_system, record.symmetry.symbol
            ),
        ));
        lines.push(Line::from(Span::styled(
            "  Average Oxidation States:",
            Theme::heading(),
        )));
        for (element, state) in &record.average_oxidation_states {
            lines.push(Line::from(vec![
                Span::styled(format!("    {} ", Icons::DOT), Theme::text_dim()),
                Span::styled(format!("{}: ", element), Theme::heading()),
                Span::styled(state.to_string(), Theme::oxidation_state(*state)),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}: ", label), Theme::text_secondary()),
        Span::styled(value, Theme::text()),
    ])
}

fn render_shortcuts(frame: &mut Frame, area: Rect, app: &App) {
    let submit_style = if app.search.can_submit() {
        Theme::shortcut_key()
    } else {
        Theme::text_dim()
    };

    let line = Line::from(vec![
        Span::styled(" [Enter]", submit_style),
        Span::styled(" Search ", Theme::shortcut_desc()),
        Span::styled("[↑/↓]", Theme::shortcut_key()),
        Span::styled(" Scroll ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help ", Theme::shortcut_desc()),
        Span::styled("[Esc]", Theme::shortcut_key()),
        Span::styled(" Quit", Theme::shortcut_desc()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter        ", Theme::shortcut_key()),
            Span::styled("Search for the formula", Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("↑/↓          ", Theme::shortcut_key()),
            Span::styled("Scroll results", Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("PageUp/Down  ", Theme::shortcut_key()),
            Span::styled("Scroll page", Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Ctrl+Q / Esc ", Theme::shortcut_key()),
            Span::styled("Quit", Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Ctrl+C       ", Theme::shortcut_key()),
            Span::styled("Force quit", Theme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Use * as a wildcard, e.g. CrO* or *O3",
            Theme::text_secondary(),
        )),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RelayClient;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn chromium_oxide() -> MaterialRecord {
        serde_json::from_value(json!({
            "material_id": "mp-510",
            "formula_pretty": "CrO3",
            "volume": 64.5,
            "density": 2.57,
            "symmetry": {"crystal_system": "Orthorhombic", "symbol": "Ama2"},
            "average_oxidation_states": {"Cr": 6.0, "O": -2.0}
        }))
        .unwrap()
    }

    #[test]
    fn test_result_lines_per_card() {
        let lines = result_lines(&[chromium_oxide(), MaterialRecord::default()]);
        // 6 fixed lines + 2 states + spacer, then 6 + spacer
        assert_eq!(lines.len(), 9 + 7);
    }

    #[test]
    fn test_render_results() {
        let mut app = App::new(RelayClient::new("http://127.0.0.1:1"));
        app.search.results = vec![chromium_oxide()];

        let screen = draw(&app);
        assert!(screen.contains("CrO3"));
        assert!(screen.contains("Material ID: mp-510"));
        assert!(screen.contains("Orthorhombic (Ama2)"));
        assert!(screen.contains("1 result(s)"));
    }

    #[test]
    fn test_render_loading_and_error() {
        let mut app = App::new(RelayClient::new("http://127.0.0.1:1"));
        app.search.loading = true;
        assert!(draw(&app).contains("Loading..."));

        app.search.loading = false;
        app.search.error = "Failed to fetch data.".to_string();
        assert!(draw(&app).contains("Failed to fetch data."));
    }
}

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

type Bindings = &'static [(&'static str, &'static str)];

const BINDINGS: &[(&str, Bindings)] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("q", "Quit application"),
            ("g", "Go to a route (/ or /recipe/<id>)"),
            ("Ctrl+C", "Quit from anywhere"),
        ],
    ),
    (
        "Catalog",
        &[
            ("←/p →/n", "Previous/next page"),
            ("↑/k ↓/j", "Move between cards"),
            ("c/C", "Next/previous category"),
            ("1-4", "All / Vodka / Rum / Gin"),
            ("f/Space", "Favorite or unfavorite the card"),
            ("Tab", "Switch between drinks and favorites"),
            ("Enter", "Open recipe"),
            ("m", "Play or mute music"),
        ],
    ),
    (
        "Recipe",
        &[
            ("↑/↓", "Scroll recipe"),
            ("PgUp/PgDn", "Scroll page up/down"),
            ("Esc/b", "Back to the list"),
        ],
    ),
];

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let key = Style::default().fg(Color::Yellow);
    let section = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut help_text = vec![Line::from("")];
    for (title, bindings) in BINDINGS {
        help_text.push(Line::from(Span::styled(format!("  {title}"), section)));
        for (keys, action) in *bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {keys:<10}"), key),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

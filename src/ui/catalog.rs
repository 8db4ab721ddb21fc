use crate::app::{App, InputMode};
use crate::api::Drink;
use crate::catalog::{Category, Focus, PAGE_SIZE};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const GRID_COLUMNS: usize = 3;

pub fn render<A>(app: &App<A>, frame: &mut Frame) {
    let area = frame.area();
    let catalog = &app.catalog;

    // Layout: header(3) + categories(3) + body(min) + pagination(1) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_line = Line::from(vec![
        Span::styled(
            " 🍸 Bar Mix – Tj's Lounge",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{} drinks]   ", catalog.drinks.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("m {}", app.music.label()),
            Style::default().fg(if app.music.is_playing() {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
    ]);
    let header = Paragraph::new(header_line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // ── Category selector ──
    let titles: Vec<Line> = Category::ALL.iter().map(|c| Line::from(c.label())).collect();
    let selected = Category::ALL
        .iter()
        .position(|c| *c == catalog.category)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Category [c/C] "),
        );
    frame.render_widget(tabs, chunks[1]);

    // ── Body: grid | favorites ──
    let body = if catalog.favorites.is_empty() {
        vec![chunks[2]]
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[2])
            .to_vec()
    };
    render_grid(app, frame, body[0]);
    if let Some(area) = body.get(1) {
        render_favorites(app, frame, *area);
    }

    // ── Pagination ──
    let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let pagination = Line::from(vec![
        Span::styled(
            "← Prev",
            if catalog.has_prev() { enabled } else { disabled },
        ),
        Span::raw(format!("   Page {}   ", catalog.page.number())),
        Span::styled(
            "Next →",
            if catalog.has_next() { enabled } else { disabled },
        ),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(pagination), chunks[3]);

    // ── Status bar / route prompt ──
    if app.input_mode == InputMode::Editing {
        render_route_prompt(app, frame, chunks[4]);
    } else {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let status_line = Line::from(vec![
            Span::styled(" ←→", key),
            Span::raw(" Page  "),
            Span::styled("Enter", key),
            Span::raw(" Recipe  "),
            Span::styled("f", key),
            Span::raw(" Favorite  "),
            Span::styled("Tab", key),
            Span::raw(" Panel  "),
            Span::styled("?", key),
            Span::raw(" Help  "),
            Span::styled("q", key),
            Span::raw(" Quit  "),
            Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(status_line), chunks[4]);
    }
}

fn render_grid<A>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let catalog = &app.catalog;
    let visible = catalog.visible();
    let filtered = catalog.filtered_len();

    let (first, last) = if visible.is_empty() {
        (0, 0)
    } else {
        let start = (catalog.page.number() - 1) * PAGE_SIZE;
        (start + 1, start + visible.len())
    };
    let range_info = format!(" {first}-{last} of {filtered} ");

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if catalog.focus == Focus::Grid {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title(" Drinks ")
        .title_bottom(Line::from(range_info).alignment(Alignment::Right));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if visible.is_empty() {
        let empty = Paragraph::new("No drinks to show")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(inner);

    for (i, drink) in visible.iter().enumerate() {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[i / GRID_COLUMNS]);
        let is_selected = catalog.focus == Focus::Grid && i == catalog.selected;
        let is_favorite = catalog.favorites.contains(&drink.id);
        render_card(frame, row[i % GRID_COLUMNS], drink, is_selected, is_favorite);
    }
}

fn render_card(frame: &mut Frame, area: Rect, drink: &Drink, selected: bool, favorite: bool) {
    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let action = if favorite { " 💔 Remove " } else { " 💖 Favorite " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" #{} ", drink.id))
        .title_bottom(Line::from(action).alignment(Alignment::Right));

    let width = area.width.saturating_sub(2) as usize;
    let lines = vec![
        Line::from(Span::styled(
            &drink.title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(&drink.image, width),
            Style::default().fg(Color::Blue),
        )),
    ];
    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(card, area);
}

fn render_favorites<A>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let catalog = &app.catalog;
    let focused = catalog.focus == Focus::Favorites;
    let width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = catalog
        .favorites
        .entries()
        .iter()
        .map(|drink| {
            ListItem::new(Line::from(vec![
                Span::styled("★ ", Style::default().fg(Color::Yellow)),
                Span::raw(truncate_str(&drink.title, width)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused {
                    Color::Cyan
                } else {
                    Color::DarkGray
                }))
                .title(" ⭐ Favorites "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(catalog.favorite_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_route_prompt<A>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let label = " Go to route (Enter to follow, Esc to cancel): ";
    let prompt = Paragraph::new(format!("{}{}", label, app.route_input))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(prompt, area);
    frame.set_cursor_position((prompt_cursor_x(area, label, &app.route_input), area.y));
}

/// Column just past the typed text, measured in terminal cells and kept
/// inside the prompt line.
fn prompt_cursor_x(area: Rect, label: &str, input: &str) -> u16 {
    let offset = u16::try_from(label.width() + input.width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1))
}

/// Truncate a string to `max_width` terminal columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            // Make room for the ellipsis.
            while width + 1 > max_width {
                match result.pop() {
                    Some(c) => width -= c.width().unwrap_or(0),
                    None => return result,
                }
            }
            result.push('…');
            return result;
        }
        width += w;
        result.push(ch);
    }
    result
}

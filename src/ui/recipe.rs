use crate::api::Recipe;
use crate::app::{App, RecipeState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const LOADING_TEXT: &str = "Loading recipe...";

pub fn render<A>(app: &App<A>, frame: &mut Frame) {
    let area = frame.area();
    let Some(view) = &app.recipe else {
        return;
    };

    // Layout: content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" /recipe/{} ", view.id));

    match &view.state {
        RecipeState::Loading => {
            let loading = Paragraph::new(LOADING_TEXT)
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(loading, chunks[0]);
        }
        RecipeState::Loaded(recipe) => {
            let content = Paragraph::new(recipe_lines(recipe))
                .wrap(Wrap { trim: false })
                .scroll((view.scroll, 0))
                .block(block.title_bottom(
                    Line::from(format!(" scroll: {} ", view.scroll)).alignment(Alignment::Right),
                ));
            frame.render_widget(content, chunks[0]);
        }
    }

    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" Esc", key),
        Span::raw(" ← Back to List  "),
        Span::styled("↑↓/PgUp/PgDn", key),
        Span::raw(" Scroll  "),
        Span::styled("g", key),
        Span::raw(" Go to  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[1]);
}

fn recipe_lines(recipe: &Recipe) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD);
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            &recipe.title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            &recipe.image,
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Difficulty: ", label),
            Span::raw(&recipe.difficulty),
        ]),
        Line::from(vec![Span::styled("Portion: ", label), Span::raw(&recipe.portion)]),
        Line::from(vec![Span::styled("Time: ", label), Span::raw(&recipe.time)]),
        Line::from(""),
        Line::from(recipe.description.as_str()),
        Line::from(""),
        Line::from(Span::styled("Ingredients:", heading)),
    ];
    lines.extend(
        recipe
            .ingredients
            .iter()
            .map(|ing| Line::from(format!("  • {ing}"))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Method:", heading)));
    lines.extend(
        recipe
            .steps()
            .into_iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("  {}. {step}", i + 1))),
    );
    lines
}

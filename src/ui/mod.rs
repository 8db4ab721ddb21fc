mod catalog;
mod help;
mod recipe;

use crate::app::{App, View};
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render<A>(app: &App<A>, frame: &mut Frame) {
    match app.view {
        View::Catalog => catalog::render(app, frame),
        View::Recipe => recipe::render(app, frame),
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DrinkId;
    use crate::app::tests::{app_with, eight_drinks};
    use crate::loader::fake::{FakeApi, recipe};
    use crate::route::Route;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen<A>(app: &App<A>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn test_catalog_shows_first_page_and_pagination() {
        let (mut app, _dir) = app_with(FakeApi::with_drinks(eight_drinks()));
        app.navigate(Route::Catalog);
        app.wait_for_load().await;

        let text = screen(&app);
        assert!(text.contains("Drink 1"));
        assert!(text.contains("Drink 6"));
        assert!(!text.contains("Drink 7"));
        assert!(text.contains("Page 1"));
        assert!(text.contains("1-6 of 8"));
        assert!(!text.contains("Favorites "));
    }

    #[tokio::test]
    async fn test_favorites_panel_appears_once_non_empty() {
        let (mut app, _dir) = app_with(FakeApi::with_drinks(eight_drinks()));
        app.navigate(Route::Catalog);
        app.wait_for_load().await;
        app.toggle_favorite();

        let text = screen(&app);
        assert!(text.contains("Favorites"));
        assert!(text.contains("Remove"));
    }

    #[tokio::test]
    async fn test_hanging_recipe_renders_loading() {
        let mut api = FakeApi::default();
        api.hanging.insert(DrinkId::from("42"));
        let (mut app, _dir) = app_with(api);
        app.navigate("/recipe/42".parse().unwrap());

        for _ in 0..3 {
            tokio::task::yield_now().await;
            app.poll_loads();
            assert!(screen(&app).contains("Loading recipe..."));
        }
    }

    #[tokio::test]
    async fn test_loaded_recipe_renders_fields() {
        let mut api = FakeApi::default();
        let mut gin_fizz = recipe("42", "Gin Fizz");
        gin_fizz.method = serde_json::from_str(r#"[{"Step 1": "Shake hard."}]"#).unwrap();
        api.add_recipe(gin_fizz);
        let (mut app, _dir) = app_with(api);
        app.navigate(Route::Recipe(DrinkId::from("42")));
        app.wait_for_load().await;

        let text = screen(&app);
        assert!(text.contains("Gin Fizz"));
        assert!(text.contains("Difficulty: Easy"));
        assert!(text.contains("• ice"));
        assert!(text.contains("1. Shake hard."));
        assert!(!text.contains("Loading recipe..."));
    }

    #[tokio::test]
    async fn test_help_overlay() {
        let (mut app, _dir) = app_with(FakeApi::default());
        app.show_help = true;
        assert!(screen(&app).contains("Keybindings"));
    }
}

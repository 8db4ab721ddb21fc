use crate::api::{CocktailApi, DrinkId, Recipe};
use crate::audio::BackgroundMusic;
use crate::catalog::{CatalogState, Category};
use crate::favorites::{FavoritesStore, Toggled};
use crate::loader::{LoadEvent, Loader, RecipeToken};
use crate::route::Route;

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Catalog,
    Recipe,
}

/// Input mode for the route prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeState {
    Loading,
    Loaded(Recipe),
}

/// One mounted recipe screen. Its token identifies the only fetch whose
/// result it will accept.
#[derive(Debug)]
pub struct RecipeView {
    pub id: DrinkId,
    pub token: RecipeToken,
    pub state: RecipeState,
    pub scroll: u16,
}

/// Main application state.
pub struct App<A> {
    loader: Loader<A>,
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    pub catalog: CatalogState,
    pub music: BackgroundMusic,

    pub recipe: Option<RecipeView>,

    pub route_input: String,
    pub input_mode: InputMode,

    pub status_msg: String,
}

impl<A: CocktailApi> App<A> {
    pub fn new(api: A, favorites: FavoritesStore, music: BackgroundMusic) -> Self {
        Self {
            loader: Loader::new(api),
            should_quit: false,
            view: View::Catalog,
            show_help: false,

            catalog: CatalogState::new(favorites),
            music,

            recipe: None,

            route_input: String::new(),
            input_mode: InputMode::Normal,

            status_msg: String::new(),
        }
    }

    pub fn route(&self) -> Route {
        match (&self.view, &self.recipe) {
            (View::Recipe, Some(r)) => Route::Recipe(r.id.clone()),
            _ => Route::Catalog,
        }
    }

    /// Switch screens. Entering the catalog the first time fires the list
    /// request; entering a recipe fires its detail request unless that same
    /// recipe is already on screen.
    pub fn navigate(&mut self, route: Route) {
        tracing::info!(%route, "navigate");
        match route {
            Route::Catalog => {
                self.loader.cancel_recipe();
                self.recipe = None;
                self.view = View::Catalog;
                if !self.catalog.requested {
                    self.catalog.requested = true;
                    self.loader.load_drinks();
                    self.status_msg = "Loading drinks...".to_string();
                }
            }
            Route::Recipe(id) => {
                if self.view == View::Recipe
                    && self.recipe.as_ref().is_some_and(|r| r.id == id)
                {
                    return;
                }
                let token = self.loader.load_recipe(id.clone());
                self.recipe = Some(RecipeView {
                    id,
                    token,
                    state: RecipeState::Loading,
                    scroll: 0,
                });
                self.view = View::Recipe;
            }
        }
    }

    /// Drain everything the background fetches have delivered so far.
    pub fn poll_loads(&mut self) {
        while let Some(event) = self.loader.try_next() {
            self.apply(event);
        }
    }

    /// Wait for one background result and apply it.
    pub async fn wait_for_load(&mut self) {
        if let Some(event) = self.loader.next().await {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Drinks(Ok(drinks)) => {
                tracing::info!(count = drinks.len(), "drink list loaded");
                self.status_msg = format!("{} drinks loaded", drinks.len());
                self.catalog.replace_drinks(drinks);
            }
            LoadEvent::Drinks(Err(e)) => {
                // No error state: the catalog just stays empty.
                tracing::warn!(error = %e, "drink list request failed");
                self.status_msg.clear();
            }
            LoadEvent::Recipe { token, id, result } => {
                let Some(view) = self.recipe.as_mut().filter(|v| v.token == token) else {
                    tracing::debug!(%id, "discarding stale recipe response");
                    return;
                };
                match result {
                    Ok(recipe) => {
                        tracing::info!(%id, title = %recipe.title, "recipe loaded");
                        view.state = RecipeState::Loaded(recipe);
                    }
                    Err(e) => {
                        // Stays in Loading; nothing is surfaced.
                        tracing::error!(%id, error = %e, "recipe request failed");
                    }
                }
            }
        }
    }

    pub fn set_category(&mut self, category: Category) {
        self.catalog.set_category(category);
        self.status_msg = format!(
            "{}: {} drinks",
            category.label(),
            self.catalog.filtered_len()
        );
    }

    pub fn next_category(&mut self) {
        self.set_category(self.catalog.category.next());
    }

    pub fn prev_category(&mut self) {
        self.set_category(self.catalog.category.prev());
    }

    pub fn next_page(&mut self) {
        self.catalog.next_page();
    }

    pub fn prev_page(&mut self) {
        self.catalog.prev_page();
    }

    /// Toggle the drink under the cursor.
    pub fn toggle_favorite(&mut self) {
        let Some(drink) = self.catalog.selected_drink() else {
            return;
        };
        match self.catalog.favorites.toggle(&drink) {
            Ok(Toggled::Added) => self.status_msg = format!("Added {} to favorites", drink.title),
            Ok(Toggled::Removed) => {
                self.status_msg = format!("Removed {} from favorites", drink.title)
            }
            Err(e) => {
                tracing::error!(error = %e, "could not save favorites");
                self.status_msg = format!("Could not save favorites: {e}");
            }
        }
        self.catalog.after_favorites_changed();
    }

    pub fn toggle_music(&mut self) {
        if let Err(e) = self.music.toggle() {
            tracing::warn!(error = %e, "music control failed");
            self.status_msg = e.to_string();
        }
    }

    pub fn open_selected(&mut self) {
        if let Some(drink) = self.catalog.selected_drink() {
            self.navigate(Route::Recipe(drink.id));
        }
    }

    /// Parse and follow whatever is in the route prompt.
    pub fn submit_route(&mut self) {
        self.input_mode = InputMode::Normal;
        let input = std::mem::take(&mut self.route_input);
        match input.parse::<Route>() {
            Ok(route) => self.navigate(route),
            Err(e) => self.status_msg = e.to_string(),
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(r) = self.recipe.as_mut() {
            r.scroll = r.scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        if let Some(r) = self.recipe.as_mut() {
            r.scroll = r.scroll.saturating_sub(1);
        }
    }

    pub fn scroll_page_down(&mut self) {
        if let Some(r) = self.recipe.as_mut() {
            r.scroll = r.scroll.saturating_add(20);
        }
    }

    pub fn scroll_page_up(&mut self) {
        if let Some(r) = self.recipe.as_mut() {
            r.scroll = r.scroll.saturating_sub(20);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::Drink;
    use crate::audio::{AudioError, AudioOutput};
    use crate::favorites::FileStorage;
    use crate::loader::fake::{FakeApi, drink, recipe};
    use std::time::Duration;

    struct Silent;

    impl AudioOutput for Silent {
        fn play(&mut self) -> Result<(), AudioError> {
            Ok(())
        }

        fn pause(&mut self) -> Result<(), AudioError> {
            Ok(())
        }
    }

    pub(crate) fn app_with(api: FakeApi) -> (App<FakeApi>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let favorites = FavoritesStore::load(Box::new(FileStorage::new(dir.path()))).unwrap();
        let music = BackgroundMusic::new(Box::new(Silent));
        (App::new(api, favorites, music), dir)
    }

    pub(crate) fn eight_drinks() -> Vec<Drink> {
        (1..=8)
            .map(|i| drink(&i.to_string(), &format!("Drink {i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_catalog_mount_loads_list_once() {
        let (mut app, _dir) = app_with(FakeApi::with_drinks(eight_drinks()));
        app.navigate(Route::Catalog);
        app.wait_for_load().await;

        assert_eq!(app.catalog.drinks.len(), 8);
        assert!(app.catalog.requested);
        assert_eq!(app.status_msg, "8 drinks loaded");

        // Returning to the catalog does not fetch again.
        app.navigate(Route::Recipe(DrinkId::from("1")));
        app.navigate(Route::Catalog);
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.poll_loads();
        assert_eq!(app.catalog.drinks.len(), 8);
    }

    #[tokio::test]
    async fn test_eight_drinks_next_page_scenario() {
        let (mut app, _dir) = app_with(FakeApi::with_drinks(eight_drinks()));
        app.navigate(Route::Catalog);
        app.wait_for_load().await;

        let ids: Vec<_> = app.catalog.visible().iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
        assert!(app.catalog.has_next());

        app.next_page();
        let ids: Vec<_> = app.catalog.visible().iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["7", "8"]);
        assert!(!app.catalog.has_next());
    }

    #[tokio::test]
    async fn test_failed_list_leaves_catalog_empty() {
        let (mut app, _dir) = app_with(FakeApi::default());
        app.navigate(Route::Catalog);
        app.wait_for_load().await;
        assert!(app.catalog.drinks.is_empty());
        assert!(app.status_msg.is_empty());
    }

    #[tokio::test]
    async fn test_recipe_loads_into_view() {
        let mut api = FakeApi::default();
        api.add_recipe(recipe("42", "Gin Fizz"));
        let (mut app, _dir) = app_with(api);

        app.navigate(Route::Recipe(DrinkId::from("42")));
        assert_eq!(app.view, View::Recipe);
        assert_eq!(app.recipe.as_ref().unwrap().state, RecipeState::Loading);

        app.wait_for_load().await;
        match &app.recipe.as_ref().unwrap().state {
            RecipeState::Loaded(r) => assert_eq!(r.title, "Gin Fizz"),
            other => panic!("unexpected state: {other:?}"),
        }
        assert_eq!(app.route(), Route::Recipe(DrinkId::from("42")));
    }

    #[tokio::test]
    async fn test_failed_recipe_stays_loading() {
        let (mut app, _dir) = app_with(FakeApi::default());
        app.navigate(Route::Recipe(DrinkId::from("404")));
        app.wait_for_load().await;
        assert_eq!(app.recipe.as_ref().unwrap().state, RecipeState::Loading);
    }

    #[tokio::test]
    async fn test_hanging_recipe_stays_loading() {
        let mut api = FakeApi::default();
        api.hanging.insert(DrinkId::from("42"));
        let (mut app, _dir) = app_with(api);

        app.navigate(Route::Recipe(DrinkId::from("42")));
        let waited = tokio::time::timeout(Duration::from_millis(50), app.wait_for_load()).await;
        assert!(waited.is_err());
        assert_eq!(app.recipe.as_ref().unwrap().state, RecipeState::Loading);
    }

    #[tokio::test]
    async fn test_stale_recipe_response_is_discarded() {
        let mut api = FakeApi::default();
        api.add_recipe(recipe("1", "Mojito"));
        api.add_recipe(recipe("2", "Daiquiri"));
        let (mut app, _dir) = app_with(api);

        app.navigate(Route::Recipe(DrinkId::from("1")));
        let stale = app.recipe.as_ref().unwrap().token;
        app.navigate(Route::Recipe(DrinkId::from("2")));

        // A late answer for the superseded fetch must not land.
        app.apply(LoadEvent::Recipe {
            token: stale,
            id: DrinkId::from("1"),
            result: Ok(recipe("1", "Mojito")),
        });
        assert_eq!(app.recipe.as_ref().unwrap().state, RecipeState::Loading);

        app.wait_for_load().await;
        match &app.recipe.as_ref().unwrap().state {
            RecipeState::Loaded(r) => assert_eq!(r.title, "Daiquiri"),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_recipe_route_does_not_refetch() {
        let mut api = FakeApi::default();
        api.hanging.insert(DrinkId::from("9"));
        let (mut app, _dir) = app_with(api);

        app.navigate(Route::Recipe(DrinkId::from("9")));
        let token = app.recipe.as_ref().unwrap().token;
        app.navigate(Route::Recipe(DrinkId::from("9")));
        assert_eq!(app.recipe.as_ref().unwrap().token, token);
    }

    #[tokio::test]
    async fn test_leaving_recipe_drops_late_response() {
        let (mut app, _dir) = app_with(FakeApi::with_drinks(Vec::new()));
        app.navigate(Route::Recipe(DrinkId::from("3")));
        let token = app.recipe.as_ref().unwrap().token;
        app.navigate(Route::Catalog);

        app.apply(LoadEvent::Recipe {
            token,
            id: DrinkId::from("3"),
            result: Ok(recipe("3", "Rum Punch")),
        });
        assert!(app.recipe.is_none());
        assert_eq!(app.view, View::Catalog);
    }

    #[tokio::test]
    async fn test_toggle_favorite_on_selected_card() {
        let (mut app, dir) = app_with(FakeApi::with_drinks(vec![drink("5", "Mojito")]));
        app.navigate(Route::Catalog);
        app.wait_for_load().await;

        app.toggle_favorite();
        assert_eq!(app.catalog.favorites.entries(), &[drink("5", "Mojito")]);
        assert_eq!(app.status_msg, "Added Mojito to favorites");

        let raw = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
        let persisted: Vec<Drink> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, vec![drink("5", "Mojito")]);

        app.toggle_favorite();
        assert!(app.catalog.favorites.is_empty());
    }

    #[tokio::test]
    async fn test_route_prompt() {
        let (mut app, _dir) = app_with(FakeApi::default());
        app.input_mode = InputMode::Editing;
        app.route_input = "/nowhere".to_string();
        app.submit_route();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status_msg, "No route matches '/nowhere'");
        assert_eq!(app.view, View::Catalog);

        app.route_input = "/recipe/77".to_string();
        app.submit_route();
        assert_eq!(app.route(), Route::Recipe(DrinkId::from("77")));
        assert!(app.route_input.is_empty());
    }

    #[tokio::test]
    async fn test_category_change_reports_count() {
        let drinks = vec![drink("1", "Vodka Tonic"), drink("2", "Mojito")];
        let (mut app, _dir) = app_with(FakeApi::with_drinks(drinks));
        app.navigate(Route::Catalog);
        app.wait_for_load().await;

        app.next_category();
        assert_eq!(app.catalog.category, Category::Vodka);
        assert_eq!(app.status_msg, "Vodka: 1 drinks");
        app.prev_category();
        assert_eq!(app.catalog.category, Category::All);
    }

    #[tokio::test]
    async fn test_music_toggle() {
        let (mut app, _dir) = app_with(FakeApi::default());
        app.toggle_music();
        assert!(app.music.is_playing());
        app.toggle_music();
        assert!(!app.music.is_playing());
    }
}

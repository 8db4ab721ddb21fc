mod api;
mod app;
mod audio;
mod catalog;
mod config;
mod favorites;
mod loader;
mod logging;
mod route;
mod ui;

use api::{CocktailApi, CocktailClient, DEFAULT_API_HOST, DEFAULT_BASE_URL, DrinkId};
use app::{App, InputMode, View};
use audio::{BackgroundMusic, CommandPlayer, DEFAULT_PLAYER};
use catalog::Category;
use clap::{Parser, Subcommand};
use config::Paths;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use favorites::{FavoritesStore, FileStorage};
use route::Route;
use std::path::PathBuf;
use std::time::Duration;

/// Cocktail catalog and recipe viewer for the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// RapidAPI key sent with every request
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// RapidAPI host header
    #[arg(long, env = "RAPIDAPI_HOST", default_value = DEFAULT_API_HOST, global = true)]
    api_host: String,

    /// Base URL of the cocktail API
    #[arg(long, env = "BAR_MIX_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Directory holding favorites and the default music track
    #[arg(long, env = "BAR_MIX_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive viewer (default)
    Run {
        /// Route to open first: "/" or "/recipe/<id>"
        #[arg(long, default_value = "/")]
        route: Route,
        /// Music track to loop
        #[arg(long)]
        music: Option<PathBuf>,
        /// Player command line; the track path is appended
        #[arg(long, default_value = DEFAULT_PLAYER)]
        player: String,
    },
    /// Print the saved favorites
    Favorites,
    /// Fetch and print one recipe
    Recipe {
        /// Drink identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Normalize command
    let command = cli.command.unwrap_or(Commands::Run {
        route: Route::Catalog,
        music: None,
        player: DEFAULT_PLAYER.to_string(),
    });

    let paths = Paths::resolve(cli.data_dir)?;
    let _log_guard = logging::setup_logging(cli.verbose, &paths.log_file())?;
    tracing::info!(data_dir = %paths.data_dir.display(), "starting");

    let favorites = FavoritesStore::load(Box::new(FileStorage::new(&paths.data_dir)))?;

    match command {
        Commands::Favorites => {
            if favorites.is_empty() {
                eprintln!("No favorites yet.");
            }
            for drink in favorites.entries() {
                println!("{:>5}  {}  {}", drink.id, drink.title, drink.image);
            }
        }
        Commands::Recipe { id } => {
            let settings = config::api_settings(
                cli.api_key.as_deref(),
                &cli.api_host,
                &cli.base_url,
                cli.timeout_secs,
            )?;
            let client = CocktailClient::new(&settings)?;
            let recipe = client.recipe(&DrinkId::from(id.as_str())).await?;
            println!("{}", recipe.title);
            println!("{}", recipe.image);
            println!();
            println!("Difficulty: {}", recipe.difficulty);
            println!("Portion: {}", recipe.portion);
            println!("Time: {}", recipe.time);
            println!();
            println!("{}", recipe.description);
            println!();
            println!("Ingredients:");
            for ing in &recipe.ingredients {
                println!("  • {ing}");
            }
            println!();
            println!("Method:");
            for (i, step) in recipe.steps().iter().enumerate() {
                println!("  {}. {step}", i + 1);
            }
        }
        Commands::Run {
            route,
            music,
            player,
        } => {
            let settings = config::api_settings(
                cli.api_key.as_deref(),
                &cli.api_host,
                &cli.base_url,
                cli.timeout_secs,
            )?;
            let client = CocktailClient::new(&settings)?;
            let track = config::track_or_default(music.as_deref(), &paths);
            let music = BackgroundMusic::new(Box::new(CommandPlayer::new(&player, track)?));

            // Create app
            let mut app = App::new(client, favorites, music);
            app.navigate(route);

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            ratatui::restore();

            shutdown(app, result)?;
        }
    }

    Ok(())
}

/// Stop the session's music before reporting how the loop ended. The error
/// then leaves `main` normally so the log guard flushes.
fn shutdown<A: CocktailApi>(
    app: App<A>,
    result: Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    drop(app);
    if let Err(e) = &result {
        tracing::error!(error = %e, "ui loop failed");
    }
    result
}

async fn run_app<A: CocktailApi>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.poll_loads();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a short timeout so fetched data shows up promptly
        if crossterm::event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key);
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
}

fn handle_key<A: CocktailApi>(app: &mut App<A>, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_route_input(app, key);
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('g') => {
            app.input_mode = InputMode::Editing;
            app.route_input = app.route().to_string();
            return;
        }
        _ => {}
    }

    match app.view {
        View::Catalog => handle_catalog_key(app, key),
        View::Recipe => handle_recipe_key(app, key),
    }
}

fn handle_route_input<A: CocktailApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_route(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.route_input.clear();
        }
        KeyCode::Backspace => {
            app.route_input.pop();
        }
        KeyCode::Char(c) => app.route_input.push(c),
        _ => {}
    }
}

fn handle_catalog_key<A: CocktailApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('n') => app.next_page(),
        KeyCode::Left | KeyCode::Char('p') => app.prev_page(),
        KeyCode::Down | KeyCode::Char('j') => app.catalog.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.catalog.select_prev(),
        KeyCode::Char('c') => app.next_category(),
        KeyCode::Char('C') => app.prev_category(),
        KeyCode::Char('1') => app.set_category(Category::All),
        KeyCode::Char('2') => app.set_category(Category::Vodka),
        KeyCode::Char('3') => app.set_category(Category::Rum),
        KeyCode::Char('4') => app.set_category(Category::Gin),
        KeyCode::Char('f') | KeyCode::Char(' ') => app.toggle_favorite(),
        KeyCode::Tab | KeyCode::BackTab => app.catalog.toggle_focus(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('m') => app.toggle_music(),
        _ => {}
    }
}

fn handle_recipe_key<A: CocktailApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.navigate(Route::Catalog),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::PageDown => app.scroll_page_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        _ => {}
    }
}

use crate::api::{ApiError, CocktailApi, Drink, DrinkId, Recipe};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

/// Identity of one recipe fetch. Only the most recent token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeToken(pub(crate) u64);

/// Results delivered from background fetches to the UI loop.
#[derive(Debug)]
pub enum LoadEvent {
    Drinks(Result<Vec<Drink>, ApiError>),
    Recipe {
        token: RecipeToken,
        id: DrinkId,
        result: Result<Recipe, ApiError>,
    },
}

/// Spawns API requests on the runtime and funnels their results back
/// through a channel the UI loop drains.
pub struct Loader<A> {
    api: Arc<A>,
    tx: UnboundedSender<LoadEvent>,
    rx: UnboundedReceiver<LoadEvent>,
    generation: u64,
    recipe_task: Option<JoinHandle<()>>,
}

impl<A: CocktailApi> Loader<A> {
    pub fn new(api: A) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            api: Arc::new(api),
            tx,
            rx,
            generation: 0,
            recipe_task: None,
        }
    }

    /// Fire the list request. The result arrives as `LoadEvent::Drinks`.
    pub fn load_drinks(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_drinks().await;
            let _ = tx.send(LoadEvent::Drinks(result));
        });
    }

    /// Fire a recipe request, aborting whichever one was in flight.
    pub fn load_recipe(&mut self, id: DrinkId) -> RecipeToken {
        self.cancel_recipe();
        self.generation += 1;
        let token = RecipeToken(self.generation);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tracing::debug!(%id, generation = token.0, "recipe fetch started");
        self.recipe_task = Some(tokio::spawn(async move {
            let result = api.recipe(&id).await;
            let _ = tx.send(LoadEvent::Recipe { token, id, result });
        }));
        token
    }

    pub fn cancel_recipe(&mut self) {
        if let Some(task) = self.recipe_task.take() {
            task.abort();
        }
    }

    pub fn try_next(&mut self) -> Option<LoadEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event. Never returns `None` while the loader is alive
    /// because it holds a sender itself.
    pub async fn next(&mut self) -> Option<LoadEvent> {
        self.rx.recv().await
    }
}

impl<A> Drop for Loader<A> {
    fn drop(&mut self) {
        if let Some(task) = self.recipe_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// In-process API double. Unknown recipes fail with a 404, and ids in
    /// `hanging` never resolve.
    #[derive(Default)]
    pub struct FakeApi {
        pub drinks: Option<Vec<Drink>>,
        pub recipes: HashMap<DrinkId, Recipe>,
        pub hanging: HashSet<DrinkId>,
    }

    impl FakeApi {
        pub fn with_drinks(drinks: Vec<Drink>) -> Self {
            Self {
                drinks: Some(drinks),
                ..Self::default()
            }
        }

        pub fn add_recipe(&mut self, recipe: Recipe) {
            self.recipes.insert(recipe.id.clone(), recipe);
        }
    }

    impl CocktailApi for FakeApi {
        async fn list_drinks(&self) -> Result<Vec<Drink>, ApiError> {
            self.drinks.clone().ok_or(ApiError::Status {
                status: 503,
                url: "fake://".to_string(),
            })
        }

        async fn recipe(&self, id: &DrinkId) -> Result<Recipe, ApiError> {
            if self.hanging.contains(id) {
                std::future::pending::<()>().await;
            }
            self.recipes.get(id).cloned().ok_or(ApiError::Status {
                status: 404,
                url: format!("fake://{id}"),
            })
        }
    }

    pub fn drink(id: &str, title: &str) -> Drink {
        Drink {
            id: DrinkId::from(id),
            title: title.to_string(),
            image: format!("https://img.test/{id}.jpg"),
        }
    }

    pub fn recipe(id: &str, title: &str) -> Recipe {
        Recipe {
            id: DrinkId::from(id),
            title: title.to_string(),
            image: format!("https://img.test/{id}.jpg"),
            difficulty: "Easy".to_string(),
            portion: "1 glass".to_string(),
            time: "5 min".to_string(),
            description: format!("{title} description"),
            ingredients: vec!["ice".to_string()],
            method: Vec::new(),
        }
    }
}

use crate::api::Drink;
use crate::favorites::FavoritesStore;

pub const PAGE_SIZE: usize = 6;

/// Category filter. Matching is a keyword heuristic on the title, there is no
/// structured tag on a drink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    Vodka,
    Rum,
    Gin,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::All, Self::Vodka, Self::Rum, Self::Gin];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Vodka => "vodka",
            Self::Rum => "rum",
            Self::Gin => "gin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Vodka => "Vodka",
            Self::Rum => "Rum",
            Self::Gin => "Gin",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Vodka,
            Self::Vodka => Self::Rum,
            Self::Rum => Self::Gin,
            Self::Gin => Self::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::All => Self::Gin,
            Self::Vodka => Self::All,
            Self::Rum => Self::Vodka,
            Self::Gin => Self::Rum,
        }
    }

    pub fn matches(self, title: &str) -> bool {
        match self {
            Self::All => true,
            _ => title.to_lowercase().contains(self.keyword()),
        }
    }
}

/// One-based page cursor over a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(usize);

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl Page {
    pub fn number(self) -> usize {
        self.0
    }

    pub fn has_prev(self) -> bool {
        self.0 > 1
    }

    pub fn has_next(self, filtered_len: usize) -> bool {
        self.0 * PAGE_SIZE < filtered_len
    }

    /// Index range of this page, clamped to the list. Pages past the end are
    /// empty.
    pub fn range(self, filtered_len: usize) -> std::ops::Range<usize> {
        let start = ((self.0 - 1) * PAGE_SIZE).min(filtered_len);
        let end = (self.0 * PAGE_SIZE).min(filtered_len);
        start..end
    }
}

/// Which panel the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    Favorites,
}

/// State owned by the catalog screen.
pub struct CatalogState {
    pub drinks: Vec<Drink>,
    pub favorites: FavoritesStore,
    pub category: Category,
    pub page: Page,
    pub focus: Focus,
    pub selected: usize,
    pub favorite_selected: usize,
    pub requested: bool,
}

impl CatalogState {
    pub fn new(favorites: FavoritesStore) -> Self {
        Self {
            drinks: Vec::new(),
            favorites,
            category: Category::All,
            page: Page::default(),
            focus: Focus::Grid,
            selected: 0,
            favorite_selected: 0,
            requested: false,
        }
    }

    pub fn filtered(&self) -> Vec<&Drink> {
        self.drinks
            .iter()
            .filter(|d| self.category.matches(&d.title))
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.drinks
            .iter()
            .filter(|d| self.category.matches(&d.title))
            .count()
    }

    /// Drinks on the current page.
    pub fn visible(&self) -> Vec<&Drink> {
        let filtered = self.filtered();
        let range = self.page.range(filtered.len());
        filtered[range].to_vec()
    }

    pub fn has_next(&self) -> bool {
        self.page.has_next(self.filtered_len())
    }

    pub fn has_prev(&self) -> bool {
        self.page.has_prev()
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page = Page(self.page.0 + 1);
        self.selected = 0;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page = Page(self.page.0 - 1);
        self.selected = 0;
        true
    }

    /// Switch category. The page is deliberately left alone.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.clamp_selection();
    }

    pub fn replace_drinks(&mut self, drinks: Vec<Drink>) {
        self.drinks = drinks;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible().len();
        self.selected = self.selected.min(visible.saturating_sub(1));
        let favs = self.favorites.len();
        self.favorite_selected = self.favorite_selected.min(favs.saturating_sub(1));
        if favs == 0 {
            self.focus = Focus::Grid;
        }
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Grid => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
            }
            Focus::Favorites => {
                if self.favorite_selected + 1 < self.favorites.len() {
                    self.favorite_selected += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Grid => self.selected = self.selected.saturating_sub(1),
            Focus::Favorites => self.favorite_selected = self.favorite_selected.saturating_sub(1),
        }
    }

    /// Flip focus between the grid and the favorites panel. The panel only
    /// takes focus while it has entries.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Grid if !self.favorites.is_empty() => Focus::Favorites,
            _ => Focus::Grid,
        };
    }

    /// Drink under the cursor in whichever panel has focus.
    pub fn selected_drink(&self) -> Option<Drink> {
        match self.focus {
            Focus::Grid => self.visible().get(self.selected).map(|d| (*d).clone()),
            Focus::Favorites => self.favorites.entries().get(self.favorite_selected).cloned(),
        }
    }

    pub fn after_favorites_changed(&mut self) {
        self.clamp_selection();
    }
}

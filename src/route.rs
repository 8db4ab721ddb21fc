use crate::api::DrinkId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Addressable screens: `/` and `/recipe/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Recipe(DrinkId),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("No route matches '{0}'")]
pub struct RouteError(pub String);

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Catalog);
        }
        match trimmed.strip_prefix("/recipe/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::Recipe(DrinkId::from(id))),
            _ => Err(RouteError(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Catalog => f.write_str("/"),
            Route::Recipe(id) => write!(f, "/recipe/{id}"),
        }
    }
}

//! Movies, their showings and the category list

use super::resource::ResourceStore;
use crate::core::entity::RecordId;
use crate::core::error::Result;
use crate::core::query::{Filters, Page};
use crate::core::service::DataAccess;
use crate::entities::{Movie, Showing};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// Category name used for movies without one
pub const UNCATEGORIZED: &str = "Uncategorized";

const CATEGORIES_PATH: &str = "/movie-categories";

/// Movie catalogue plus the showings of one movie at a time
pub struct MovieStore {
    movies: ResourceStore<Movie>,
    showings: ResourceStore<Showing>,
    categories: Mutex<Vec<Value>>,
}

impl MovieStore {
    pub fn new(movies: ResourceStore<Movie>) -> Self {
        let access: Arc<dyn DataAccess> = movies.access().clone();
        Self {
            showings: ResourceStore::with_path(access, format!("{}/showings", movies.path())),
            movies,
            categories: Mutex::new(Vec::new()),
        }
    }

    /// Movie list, detail and CRUD
    pub fn movies(&self) -> &ResourceStore<Movie> {
        &self.movies
    }

    /// Showings of the movie last passed to [`showings`](Self::showings)
    pub fn showing_store(&self) -> &ResourceStore<Showing> {
        &self.showings
    }

    pub fn is_loading(&self) -> bool {
        self.movies.is_loading() || self.showings.is_loading()
    }

    fn showings_path(&self, movie_id: &RecordId) -> String {
        self.movies.action_path(Some(movie_id), "showings")
    }

    fn showing_path(&self, movie_id: &RecordId, showing_id: &RecordId) -> String {
        format!("{}/{}", self.showings_path(movie_id), showing_id)
    }

    /// Load the showings of one movie
    pub async fn showings(&self, movie_id: &RecordId, params: Filters) -> Result<Page<Showing>> {
        let path = self.showings_path(movie_id);
        self.showings.list_at(&path, params).await
    }

    pub async fn create_showing(&self, movie_id: &RecordId, data: Value) -> Result<Showing> {
        let path = self.showings_path(movie_id);
        self.showings.create_at(&path, data).await
    }

    pub async fn update_showing(
        &self,
        movie_id: &RecordId,
        showing_id: &RecordId,
        data: Value,
    ) -> Result<Showing> {
        let path = self.showing_path(movie_id, showing_id);
        self.showings.update_at(&path, data).await
    }

    pub async fn delete_showing(&self, movie_id: &RecordId, showing_id: &RecordId) -> Result<()> {
        let path = self.showing_path(movie_id, showing_id);
        self.showings.remove_at(&path, showing_id).await
    }

    /// Reload the category list
    pub async fn categories(&self) -> Result<Vec<Value>> {
        self.movies
            .untracked("categories", async {
                let response = self.movies.access().get(CATEGORIES_PATH, IndexMap::new()).await?;
                let page = Page::<Value>::from_response("movie_category", response)?;
                *self.categories.lock().unwrap_or_else(PoisonError::into_inner) =
                    page.items.clone();
                Ok(page.items)
            })
            .await
    }

    /// Categories from the last successful [`categories`](Self::categories)
    pub fn category_list(&self) -> Vec<Value> {
        self.categories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn now_showing(&self) -> Vec<Movie> {
        self.movies.filter_items(Movie::is_now_showing)
    }

    /// Listed movies grouped by category name, in first-seen order
    pub fn movies_by_category(&self) -> IndexMap<String, Vec<Movie>> {
        let mut grouped: IndexMap<String, Vec<Movie>> = IndexMap::new();
        for movie in self.movies.items() {
            let category = movie
                .category_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            grouped.entry(category).or_default().push(movie);
        }
        grouped
    }

    /// Seats left and not yet started at `now`
    pub fn can_book(showing: &Showing, now: DateTime<Utc>) -> bool {
        showing.is_bookable_at(now)
    }
}

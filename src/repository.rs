use std::{collections::BTreeSet, sync::Arc};

use crate::models::{Actor, Director, DomainError, Genre, Movie, Review, User};

/// In-memory aggregate store for the whole catalogue. Constructed once at
/// startup, populated by ingestion, and handed to the web layer explicitly;
/// the only mutation after load is `add_review`, so the caller wraps the
/// repository in a lock when serving concurrent requests.
///
/// Every query is a fresh linear scan. The dataset is small and static after
/// load, so there is deliberately no index.
#[derive(Debug, Default)]
pub struct CatalogueRepository {
    users: Vec<User>,
    movies: Vec<Movie>,
    actors: BTreeSet<Arc<Actor>>,
    genres: BTreeSet<Arc<Genre>>,
    directors: BTreeSet<Arc<Director>>,
    reviews: Vec<Review>,
}

impl CatalogueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// First user whose name exactly equals `username`, if any.
    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.user_name() == username)
    }

    /// Appends; duplicate (title, year) entries are allowed to coexist.
    pub fn add_movie(&mut self, movie: Movie) {
        self.movies.push(movie);
    }

    pub fn add_actor(&mut self, actor: Arc<Actor>) {
        self.actors.insert(actor);
    }

    pub fn add_genre(&mut self, genre: Arc<Genre>) {
        self.genres.insert(genre);
    }

    pub fn add_director(&mut self, director: Arc<Director>) {
        self.directors.insert(director);
    }

    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    /// All movies in ingestion (file) order.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn genres(&self) -> impl Iterator<Item = &Arc<Genre>> {
        self.genres.iter()
    }

    pub fn genre_count(&self) -> usize {
        self.genres.len()
    }

    /// Movies where any genre name contains `keyword`, case-insensitively.
    /// The first matching genre settles the movie.
    pub fn movies_by_genre(&self, keyword: &str) -> Vec<&Movie> {
        let needle = keyword.to_lowercase();
        self.movies
            .iter()
            .filter(|m| m.genres().iter().any(|g| name_contains(g.name(), &needle)))
            .collect()
    }

    /// Same matching policy as genres, over actor full names.
    pub fn movies_by_actor(&self, keyword: &str) -> Vec<&Movie> {
        let needle = keyword.to_lowercase();
        self.movies
            .iter()
            .filter(|m| m.actors().iter().any(|a| name_contains(a.full_name(), &needle)))
            .collect()
    }

    /// Substring match over the single director name. A movie without a
    /// director is a reported error, not a skip.
    pub fn movies_by_director(&self, keyword: &str) -> Result<Vec<&Movie>, DomainError> {
        let needle = keyword.to_lowercase();
        let mut matching = Vec::new();
        for movie in &self.movies {
            let director = movie
                .director()
                .ok_or_else(|| DomainError::MissingDirector(movie.title().to_string()))?;
            if name_contains(director.full_name(), &needle) {
                matching.push(movie);
            }
        }
        Ok(matching)
    }

    /// First movie with an exact, case-sensitive title match. Exact on
    /// purpose: the detail page looks up a title it has already rendered,
    /// unlike the keyword searches above.
    pub fn movie_by_title(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.title() == title)
    }

    pub fn reviews_by_movie(&self, title: &str) -> Vec<&Review> {
        self.reviews.iter().filter(|r| r.movie_title() == title).collect()
    }
}

// An absent name never matches; an empty keyword matches every present name.
fn name_contains(name: Option<&str>, needle: &str) -> bool {
    name.is_some_and(|n| n.to_lowercase().contains(needle))
}

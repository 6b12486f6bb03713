use std::{
    cmp::Ordering,
    collections::BTreeSet,
    hash::{Hash, Hasher},
    sync::Arc,
};

use jiff::civil::DateTime;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("year {0} is before 1900")]
    YearBefore1900(i32),
    #[error("runtime must be a positive number of minutes, got {0}")]
    NonPositiveRuntime(i64),
    #[error("movie {0:?} has no director")]
    MissingDirector(String),
}

/// Empty or whitespace-only input maps to an absent name. Absent names sort
/// before present ones, which keeps the ordering total for set membership.
fn clean_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Director {
    full_name: Option<String>,
}

impl Director {
    pub fn new(raw: &str) -> Self {
        Self { full_name: clean_name(raw) }
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Genre {
    name: Option<String>,
}

impl Genre {
    pub fn new(raw: &str) -> Self {
        Self { name: clean_name(raw) }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Colleagues are name back-references, not owned entities, so an actor can
/// record everyone it shared a cast with without entangling lifetimes.
#[derive(Clone, Debug)]
pub struct Actor {
    full_name: Option<String>,
    colleagues: BTreeSet<Option<String>>,
}

impl Actor {
    pub fn new(raw: &str) -> Self {
        Self { full_name: clean_name(raw), colleagues: BTreeSet::new() }
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn add_colleague(&mut self, colleague: &Actor) {
        self.colleagues.insert(colleague.full_name.clone());
    }

    pub fn worked_with(&self, colleague: &Actor) -> bool {
        self.colleagues.contains(&colleague.full_name)
    }

    pub fn colleague_count(&self) -> usize {
        self.colleagues.len()
    }
}

// Identity is the name alone; the colleague set is incidental state.
impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for Actor {}

impl PartialOrd for Actor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Actor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.full_name.cmp(&other.full_name)
    }
}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

/// A catalogue entry. Director, actors and genres are shared handles into the
/// repository's interned sets, so two movies tagged "Drama" reference the same
/// `Genre` instance.
#[derive(Clone, Debug)]
pub struct Movie {
    title: String,
    year: i32,
    description: String,
    runtime_minutes: i64,
    director: Option<Arc<Director>>,
    actors: Vec<Arc<Actor>>,
    genres: Vec<Arc<Genre>>,
}

impl Movie {
    pub fn new(title: &str, year: i32) -> Result<Self, DomainError> {
        if year < 1900 {
            return Err(DomainError::YearBefore1900(year));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
            year,
            description: String::new(),
            runtime_minutes: 0,
            director: None,
            actors: Vec::new(),
            genres: Vec::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
    }

    pub fn runtime_minutes(&self) -> i64 {
        self.runtime_minutes
    }

    pub fn set_runtime(&mut self, minutes: i64) -> Result<(), DomainError> {
        if minutes <= 0 {
            return Err(DomainError::NonPositiveRuntime(minutes));
        }
        self.runtime_minutes = minutes;
        Ok(())
    }

    pub fn director(&self) -> Option<&Arc<Director>> {
        self.director.as_ref()
    }

    pub fn set_director(&mut self, director: Arc<Director>) {
        self.director = Some(director);
    }

    pub fn actors(&self) -> &[Arc<Actor>] {
        &self.actors
    }

    pub fn add_actor(&mut self, actor: Arc<Actor>) {
        if !self.actors.contains(&actor) {
            self.actors.push(actor);
        }
    }

    pub fn remove_actor(&mut self, actor: &Actor) {
        self.actors.retain(|a| a.as_ref() != actor);
    }

    pub fn genres(&self) -> &[Arc<Genre>] {
        &self.genres
    }

    pub fn add_genre(&mut self, genre: Arc<Genre>) {
        if !self.genres.contains(&genre) {
            self.genres.push(genre);
        }
    }

    pub fn remove_genre(&mut self, genre: &Genre) {
        self.genres.retain(|g| g.as_ref() != genre);
    }
}

// Two movies are the same entry iff title and year match.
impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.year == other.year
    }
}

impl Eq for Movie {}

impl PartialOrd for Movie {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Movie {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.title, self.year).cmp(&(&other.title, other.year))
    }
}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.year.hash(state);
    }
}

/// A review references its movie by title string rather than by handle; the
/// detail page looks reviews up the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Review {
    movie_title: String,
    review_text: String,
    rating: Option<u8>,
    timestamp: DateTime,
}

impl Review {
    /// A rating outside 1..=10 is kept as "unrated" rather than rejected.
    pub fn new(movie_title: &str, review_text: &str, rating: i64) -> Self {
        let rating = u8::try_from(rating).ok().filter(|r| (1..=10).contains(r));
        Self {
            movie_title: movie_title.to_string(),
            review_text: review_text.to_string(),
            rating,
            timestamp: minute_now(),
        }
    }

    pub fn movie_title(&self) -> &str {
        &self.movie_title
    }

    pub fn review_text(&self) -> &str {
        &self.review_text
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn timestamp(&self) -> DateTime {
        self.timestamp
    }
}

// Review timestamps carry minute precision.
fn minute_now() -> DateTime {
    let now = jiff::Zoned::now().datetime();
    jiff::civil::datetime(now.year(), now.month(), now.day(), now.hour(), now.minute(), 0, 0)
}

#[derive(Clone, Debug)]
pub struct User {
    user_name: String,
    password: String,
    watched_movies: Vec<Movie>,
    reviews: Vec<Review>,
    time_spent_watching_movies_minutes: i64,
}

impl User {
    /// `password` is expected to arrive pre-hashed; hashing lives at the
    /// authentication boundary, not in the domain.
    pub fn new(user_name: &str, password: &str) -> Self {
        Self {
            user_name: user_name.trim().to_lowercase(),
            password: password.to_string(),
            watched_movies: Vec::new(),
            reviews: Vec::new(),
            time_spent_watching_movies_minutes: 0,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn watched_movies(&self) -> &[Movie] {
        &self.watched_movies
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn time_spent_watching_movies_minutes(&self) -> i64 {
        self.time_spent_watching_movies_minutes
    }

    /// Watch time accrues once per distinct movie.
    pub fn watch_movie(&mut self, movie: Movie) {
        if !self.watched_movies.contains(&movie) {
            self.time_spent_watching_movies_minutes += movie.runtime_minutes();
            self.watched_movies.push(movie);
        }
    }

    pub fn add_review(&mut self, review: Review) {
        if !self.reviews.contains(&review) {
            self.reviews.push(review);
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.user_name == other.user_name
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_name.hash(state);
    }
}

/// Flattened record the templates render; built per displayed row only.
#[derive(Clone, Debug)]
pub struct MovieView {
    pub title: String,
    pub running_time: i64,
    pub year: i32,
    pub actors: String,
    pub director: String,
    pub genre: String,
    pub description: String,
}

impl MovieView {
    pub fn from_movie(movie: &Movie) -> Self {
        let actors = movie
            .actors()
            .iter()
            .filter_map(|a| a.full_name())
            .collect::<Vec<_>>()
            .join(", ");
        let genre = movie
            .genres()
            .iter()
            .filter_map(|g| g.name())
            .collect::<Vec<_>>()
            .join(", ");
        let director = movie
            .director()
            .and_then(|d| d.full_name())
            .unwrap_or("(unknown)")
            .to_string();

        Self {
            title: movie.title().to_string(),
            running_time: movie.runtime_minutes(),
            year: movie.year(),
            actors,
            director,
            genre,
            description: movie.description().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_construction_rejects_pre_1900_year() {
        assert!(matches!(
            Movie::new("Roundhay Garden Scene", 1888),
            Err(DomainError::YearBefore1900(1888))
        ));
    }

    #[test]
    fn movie_construction_rejects_empty_title() {
        assert!(matches!(Movie::new("", 2010), Err(DomainError::EmptyTitle)));
        assert!(matches!(Movie::new("   ", 2010), Err(DomainError::EmptyTitle)));
    }

    #[test]
    fn movie_title_is_trimmed() {
        let movie = Movie::new("  Moana  ", 2016).unwrap();
        assert_eq!(movie.title(), "Moana");
    }

    #[test]
    fn movie_rejects_non_positive_runtime() {
        let mut movie = Movie::new("Moana", 2016).unwrap();
        assert!(movie.set_runtime(0).is_err());
        assert!(movie.set_runtime(-40).is_err());
        movie.set_runtime(107).unwrap();
        assert_eq!(movie.runtime_minutes(), 107);
    }

    #[test]
    fn movie_equality_is_title_and_year() {
        let a = Movie::new("Heat", 1995).unwrap();
        let mut b = Movie::new("Heat", 1995).unwrap();
        b.set_description("LA crime saga");
        assert_eq!(a, b);
        assert_ne!(a, Movie::new("Heat", 1996).unwrap());
    }

    #[test]
    fn movie_add_actor_is_idempotent() {
        let mut movie = Movie::new("Heat", 1995).unwrap();
        let pacino = Arc::new(Actor::new("Al Pacino"));
        movie.add_actor(pacino.clone());
        movie.add_actor(Arc::new(Actor::new("Al Pacino")));
        assert_eq!(movie.actors().len(), 1);
        movie.remove_actor(&Actor::new("Nobody"));
        assert_eq!(movie.actors().len(), 1);
        movie.remove_actor(&pacino);
        assert!(movie.actors().is_empty());
    }

    #[test]
    fn absent_names_sort_first_and_compare_equal() {
        let unnamed = Director::new("   ");
        let named = Director::new("Taika Waititi");
        assert!(unnamed < named);
        assert_eq!(unnamed, Director::new(""));
    }

    #[test]
    fn actor_colleague_membership() {
        let mut lee = Actor::new("Lee");
        let kim = Actor::new("Kim");
        assert!(!lee.worked_with(&kim));
        lee.add_colleague(&kim);
        assert!(lee.worked_with(&kim));
        assert_eq!(lee.colleague_count(), 1);
    }

    #[test]
    fn review_rating_out_of_range_becomes_unrated() {
        assert_eq!(Review::new("Up", "lovely", 0).rating(), None);
        assert_eq!(Review::new("Up", "lovely", 11).rating(), None);
        assert_eq!(Review::new("Up", "lovely", 10).rating(), Some(10));
        assert_eq!(Review::new("Up", "lovely", 1).rating(), Some(1));
    }

    #[test]
    fn user_name_is_folded_and_watch_time_accrues_once() {
        let mut user = User::new("  Martin  ", "hash");
        assert_eq!(user.user_name(), "martin");

        let mut movie = Movie::new("Heat", 1995).unwrap();
        movie.set_runtime(170).unwrap();
        user.watch_movie(movie.clone());
        user.watch_movie(movie);
        assert_eq!(user.watched_movies().len(), 1);
        assert_eq!(user.time_spent_watching_movies_minutes(), 170);
    }

    #[test]
    fn movie_view_joins_names() {
        let mut movie = Movie::new("Heat", 1995).unwrap();
        movie.set_runtime(170).unwrap();
        movie.set_description("LA crime saga");
        movie.set_director(Arc::new(Director::new("Michael Mann")));
        movie.add_actor(Arc::new(Actor::new("Al Pacino")));
        movie.add_actor(Arc::new(Actor::new("Robert De Niro")));
        movie.add_genre(Arc::new(Genre::new("Crime")));
        movie.add_genre(Arc::new(Genre::new("Thriller")));

        let view = MovieView::from_movie(&movie);
        assert_eq!(view.actors, "Al Pacino, Robert De Niro");
        assert_eq!(view.genre, "Crime, Thriller");
        assert_eq!(view.director, "Michael Mann");
        assert_eq!(view.running_time, 170);
    }
}

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::Read,
    path::Path,
    sync::Arc,
};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::{
    models::{Actor, Director, Genre, Movie},
    repository::CatalogueRepository,
};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// One row of the dataset. `Genre` and `Actors` hold comma-separated tokens
/// inside a single cell; `Year` and `Runtime (Minutes)` must parse as
/// integers or the whole ingestion fails.
#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Director")]
    director: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Actors")]
    actors: String,
    #[serde(rename = "Runtime (Minutes)")]
    runtime_minutes: i64,
}

/// Loads the movie dataset from `path` into `repo`. Any malformed row aborts
/// the load; this runs once at startup before the server accepts requests.
pub fn populate(path: &Path, repo: &mut CatalogueRepository) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_records(file, repo).with_context(|| format!("ingesting {}", path.display()))?;

    info!(
        movies = repo.movies().len(),
        genres = repo.genre_count(),
        "catalogue loaded"
    );
    Ok(())
}

/// Parses CSV from `reader` and registers every entity into the repository.
///
/// Two passes: the first collects rows and accumulates each actor's colleague
/// set (cast co-occurrence), the second interns one shared handle per distinct
/// director/actor/genre and builds the movies in file order. Interning is what
/// keeps two movies tagged "Drama" pointing at the same `Genre`.
pub fn read_records(reader: impl Read, repo: &mut CatalogueRepository) -> anyhow::Result<()> {
    let mut bytes = Vec::new();
    let mut reader = reader;
    reader.read_to_end(&mut bytes).context("reading dataset")?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut csv_reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for (i, result) in csv_reader.deserialize::<MovieRecord>().enumerate() {
        let row = result.with_context(|| format!("row {}", i + 1))?;
        rows.push(row);
    }

    let mut colleagues: BTreeMap<Option<String>, BTreeSet<Option<String>>> = BTreeMap::new();
    for row in &rows {
        let cast: Vec<Option<String>> = split_tokens(&row.actors)
            .map(|tok| Actor::new(tok).full_name().map(str::to_string))
            .collect();
        for name in &cast {
            let entry = colleagues.entry(name.clone()).or_default();
            entry.extend(cast.iter().filter(|c| *c != name).cloned());
        }
    }

    let mut directors: BTreeMap<Option<String>, Arc<Director>> = BTreeMap::new();
    let mut actors: BTreeMap<Option<String>, Arc<Actor>> = BTreeMap::new();
    let mut genres: BTreeMap<Option<String>, Arc<Genre>> = BTreeMap::new();

    for (i, row) in rows.into_iter().enumerate() {
        let mut movie = Movie::new(&row.title, row.year)
            .with_context(|| format!("row {}: invalid movie", i + 1))?;
        movie.set_description(&row.description);
        movie
            .set_runtime(row.runtime_minutes)
            .with_context(|| format!("row {}: invalid runtime", i + 1))?;

        let director = Director::new(&row.director);
        let director = directors
            .entry(director.full_name().map(str::to_string))
            .or_insert_with(|| Arc::new(director))
            .clone();
        repo.add_director(director.clone());
        movie.set_director(director);

        for tok in split_tokens(&row.genre) {
            let genre = Genre::new(tok);
            let genre = genres
                .entry(genre.name().map(str::to_string))
                .or_insert_with(|| Arc::new(genre))
                .clone();
            repo.add_genre(genre.clone());
            movie.add_genre(genre);
        }

        for tok in split_tokens(&row.actors) {
            let key = Actor::new(tok).full_name().map(str::to_string);
            let actor = actors
                .entry(key.clone())
                .or_insert_with(|| {
                    let mut actor = Actor::new(tok);
                    for name in colleagues.get(&key).into_iter().flatten() {
                        actor.add_colleague(&Actor::new(name.as_deref().unwrap_or("")));
                    }
                    Arc::new(actor)
                })
                .clone();
            repo.add_actor(actor.clone());
            movie.add_actor(actor);
        }

        repo.add_movie(movie);
    }

    Ok(())
}

fn split_tokens(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Title,Description,Year,Director,Genre,Actors,Runtime (Minutes)\n";

    fn load(csv: &str) -> anyhow::Result<CatalogueRepository> {
        let mut repo = CatalogueRepository::new();
        read_records(csv.as_bytes(), &mut repo)?;
        Ok(repo)
    }

    #[test]
    fn single_row_round_trips_through_lookup() {
        let repo = load(&format!(
            "{HEADER}Moana,A girl sails the Pacific,2016,Ron Clements,\"Animation,Adventure\",\"Auli'i Cravalho,Dwayne Johnson\",107\n"
        ))
        .unwrap();

        let movie = repo.movie_by_title("Moana").expect("ingested movie");
        assert_eq!(movie.year(), 2016);
        assert_eq!(movie.runtime_minutes(), 107);
        assert_eq!(movie.description(), "A girl sails the Pacific");
        assert_eq!(
            movie.director().unwrap().full_name(),
            Some("Ron Clements")
        );
        let genres: Vec<_> = movie.genres().iter().filter_map(|g| g.name()).collect();
        assert_eq!(genres, ["Animation", "Adventure"]);
        let actors: Vec<_> = movie.actors().iter().filter_map(|a| a.full_name()).collect();
        assert_eq!(actors, ["Auli'i Cravalho", "Dwayne Johnson"]);
    }

    #[test]
    fn utf8_bom_is_stripped_before_the_header() {
        let csv = format!(
            "\u{feff}{HEADER}Moana,desc,2016,Ron Clements,Animation,Auli'i Cravalho,107\n"
        );
        let repo = load(&csv).unwrap();
        assert!(repo.movie_by_title("Moana").is_some());
    }

    #[test]
    fn shared_tokens_intern_to_one_instance() {
        let repo = load(&format!(
            "{HEADER}\
             First,d1,2001,Jane Doe,Drama,\"Ann Lee,Bob Roy\",90\n\
             Second,d2,2002,Jane Doe,\"Drama,Comedy\",\"Ann Lee,Cat Fay\",95\n"
        ))
        .unwrap();

        let first = repo.movie_by_title("First").unwrap();
        let second = repo.movie_by_title("Second").unwrap();

        assert!(Arc::ptr_eq(&first.genres()[0], &second.genres()[0]));
        assert!(Arc::ptr_eq(&first.actors()[0], &second.actors()[0]));
        assert!(Arc::ptr_eq(first.director().unwrap(), second.director().unwrap()));

        // Ann Lee worked with colleagues from both rows.
        let ann = &first.actors()[0];
        assert!(ann.worked_with(&Actor::new("Bob Roy")));
        assert!(ann.worked_with(&Actor::new("Cat Fay")));
        assert_eq!(ann.colleague_count(), 2);
        assert!(!ann.worked_with(&Actor::new("Jane Doe")));
    }

    #[test]
    fn genre_union_across_rows() {
        let repo = load(&format!(
            "{HEADER}\
             A,d,2001,D One,\"Drama,Comedy\",X,90\n\
             B,d,2002,D Two,\"Drama,Horror\",Y,91\n\
             C,d,2003,D Three,Sci-Fi,Z,92\n"
        ))
        .unwrap();

        let names: Vec<_> = repo.genres().filter_map(|g| g.name()).collect();
        assert_eq!(repo.genre_count(), 4);
        assert_eq!(names, ["Comedy", "Drama", "Horror", "Sci-Fi"]);
    }

    #[test]
    fn non_integer_year_aborts_ingestion() {
        let err = load(&format!(
            "{HEADER}Moana,desc,twenty-sixteen,Ron Clements,Animation,Cast,107\n"
        ))
        .unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn zero_runtime_aborts_ingestion() {
        let err = load(&format!(
            "{HEADER}Moana,desc,2016,Ron Clements,Animation,Cast,0\n"
        ))
        .unwrap_err();
        assert!(err.to_string().contains("invalid runtime"));
    }

    #[test]
    fn pre_1900_year_aborts_ingestion() {
        assert!(
            load(&format!("{HEADER}Old,desc,1888,Nobody,Short,Cast,2\n")).is_err()
        );
    }
}

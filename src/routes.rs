use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::{
    AppState,
    error::AppResult,
    models::{MovieView, Review},
    repository::CatalogueRepository,
    templates,
};

const MIN_COMMENT_LEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOption {
    Actor,
    Director,
    Genre,
}

impl SearchOption {
    pub const ALL: [SearchOption; 3] = [Self::Actor, Self::Director, Self::Genre];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::Director => "Director",
            Self::Genre => "Genre",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Actor" => Some(Self::Actor),
            "Director" => Some(Self::Director),
            "Genre" => Some(Self::Genre),
            _ => None,
        }
    }
}

/// Offset-cursor navigation URLs for a paged listing; `None` means the
/// corresponding link is not rendered.
#[derive(Debug, Default)]
pub struct PageNav {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

fn page_nav(base: &str, cursor: usize, total: usize, page_size: usize) -> PageNav {
    let mut nav = PageNav::default();

    if cursor > 0 {
        nav.prev = Some(format!("{base}?cursor={}", cursor.saturating_sub(page_size)));
        nav.first = Some(base.to_string());
    }

    if cursor + page_size < total {
        nav.next = Some(format!("{base}?cursor={}", cursor + page_size));

        let mut last_cursor = page_size * (total / page_size);
        if total % page_size == 0 {
            last_cursor -= page_size;
        }
        nav.last = Some(format!("{base}?cursor={last_cursor}"));
    }

    nav
}

fn read_repo(state: &AppState) -> AppResult<RwLockReadGuard<'_, CatalogueRepository>> {
    state.repo.read().map_err(|_| anyhow::anyhow!("repository lock poisoned").into())
}

fn write_repo(state: &AppState) -> AppResult<RwLockWriteGuard<'_, CatalogueRepository>> {
    state.repo.write().map_err(|_| anyhow::anyhow!("repository lock poisoned").into())
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    cursor: Option<usize>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let cursor = q.cursor.unwrap_or(0);
    let page_size = state.config.page_size;

    let repo = read_repo(&state)?;
    let total = repo.movies().len();
    let views: Vec<MovieView> =
        repo.movies().iter().skip(cursor).take(page_size).map(MovieView::from_movie).collect();

    let nav = page_nav("/movies", cursor, total, page_size);
    Ok(Html(templates::movie_list_page(&views, &nav)))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    title: String,
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DetailQuery>,
) -> AppResult<Response> {
    let repo = read_repo(&state)?;
    Ok(render_detail(&repo, &q.title, None))
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    title: String,
    comment: String,
    rating: Option<i64>,
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Response> {
    let comment = form.comment.trim();
    let rating = form.rating.unwrap_or(10);

    let mut repo = write_repo(&state)?;

    if repo.movie_by_title(&form.title).is_none() {
        return Ok(not_found(&form.title));
    }
    if comment.chars().count() < MIN_COMMENT_LEN {
        return Ok(render_detail(&repo, &form.title, Some("Your comment is too short")));
    }

    repo.add_review(Review::new(&form.title, comment, rating));
    tracing::info!(title = %form.title, rating = rating, "review added");

    Ok(render_detail(&repo, &form.title, None))
}

fn render_detail(repo: &CatalogueRepository, title: &str, form_error: Option<&str>) -> Response {
    match repo.movie_by_title(title) {
        Some(movie) => {
            let view = MovieView::from_movie(movie);
            let reviews = repo.reviews_by_movie(title);
            Html(templates::movie_detail_page(&view, &reviews, form_error)).into_response()
        },
        None => not_found(title),
    }
}

fn not_found(title: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(templates::not_found_page(title))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    option: String,
    keyword: String,
}

/// Paging through search results replays the last submitted keyword/option,
/// which live in cookies so the GET side carries no search state of its own.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PageQuery>,
    jar: CookieJar,
) -> AppResult<Html<String>> {
    let cursor = q.cursor.unwrap_or(0);
    let keyword = jar
        .get("keyword")
        .and_then(|c| urlencoding::decode(c.value()).ok())
        .map(|k| k.into_owned())
        .unwrap_or_default();
    let option = jar
        .get("option")
        .and_then(|c| SearchOption::parse(c.value()))
        .unwrap_or(SearchOption::Actor);

    let body = render_search(&state, option, &keyword, cursor)?;
    Ok(Html(body))
}

/// A new search stores its keyword/option and starts back at the first page.
pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> AppResult<(CookieJar, Html<String>)> {
    let keyword = form.keyword.trim().to_string();
    let option = SearchOption::parse(&form.option).unwrap_or(SearchOption::Actor);

    let jar = jar
        .add(
            Cookie::build(("keyword", urlencoding::encode(&keyword).into_owned()))
                .path("/")
                .build(),
        )
        .add(Cookie::build(("option", option.as_str())).path("/").build());

    let body = render_search(&state, option, &keyword, 0)?;
    Ok((jar, Html(body)))
}

fn render_search(
    state: &AppState,
    option: SearchOption,
    keyword: &str,
    cursor: usize,
) -> AppResult<String> {
    let page_size = state.config.page_size;
    let repo = read_repo(state)?;

    let matches = if keyword.is_empty() {
        Vec::new()
    } else {
        match option {
            SearchOption::Actor => repo.movies_by_actor(keyword),
            SearchOption::Director => repo.movies_by_director(keyword)?,
            SearchOption::Genre => repo.movies_by_genre(keyword),
        }
    };

    let total = matches.len();
    let views: Vec<MovieView> =
        matches.into_iter().skip(cursor).take(page_size).map(MovieView::from_movie).collect();

    let nav = page_nav("/search", cursor, total, page_size);
    Ok(templates::search_page(option, keyword, &views, &nav))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_forward_links_only() {
        let nav = page_nav("/movies", 0, 12, 5);
        assert!(nav.first.is_none());
        assert!(nav.prev.is_none());
        assert_eq!(nav.next.as_deref(), Some("/movies?cursor=5"));
        assert_eq!(nav.last.as_deref(), Some("/movies?cursor=10"));
    }

    #[test]
    fn middle_page_has_links_both_ways() {
        let nav = page_nav("/movies", 5, 12, 5);
        assert_eq!(nav.first.as_deref(), Some("/movies"));
        assert_eq!(nav.prev.as_deref(), Some("/movies?cursor=0"));
        assert_eq!(nav.next.as_deref(), Some("/movies?cursor=10"));
    }

    #[test]
    fn final_page_has_backward_links_only() {
        let nav = page_nav("/movies", 10, 12, 5);
        assert!(nav.next.is_none());
        assert!(nav.last.is_none());
        assert_eq!(nav.prev.as_deref(), Some("/movies?cursor=5"));
    }

    #[test]
    fn exact_multiple_total_ends_on_earlier_cursor() {
        // 10 movies at 5 a page: the last page starts at 5, not 10.
        let nav = page_nav("/movies", 0, 10, 5);
        assert_eq!(nav.last.as_deref(), Some("/movies?cursor=5"));
    }

    #[test]
    fn single_page_renders_no_nav() {
        let nav = page_nav("/movies", 0, 3, 5);
        assert!(nav.first.is_none() && nav.prev.is_none());
        assert!(nav.next.is_none() && nav.last.is_none());
    }

    #[test]
    fn search_option_round_trips() {
        for option in SearchOption::ALL {
            assert_eq!(SearchOption::parse(option.as_str()), Some(option));
        }
        assert_eq!(SearchOption::parse("Year"), None);
    }
}

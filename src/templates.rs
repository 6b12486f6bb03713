use maud::{DOCTYPE, Markup, html};

use crate::{
    models::{MovieView, Review},
    routes::{PageNav, SearchOption},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn movie_list_page(views: &[MovieView], nav: &PageNav) -> String {
    page(
        "Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-10" {
                    div class="flex items-start justify-between gap-6" {
                        h1 class="text-3xl font-bold text-gray-900" { "Movies" }
                        a class="text-sm text-blue-600 hover:text-blue-800" href="/search" { "Search" }
                    }

                    @if views.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies on this page." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for view in views {
                                (movie_card(view))
                            }
                        }
                    }

                    (nav_links(nav))
                }
            }
        },
    )
}

pub fn search_page(
    option: SearchOption,
    keyword: &str,
    views: &[MovieView],
    nav: &PageNav,
) -> String {
    page(
        "Search",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-10" {
                    div class="flex items-start justify-between gap-6" {
                        h1 class="text-3xl font-bold text-gray-900" { "Search" }
                        a class="text-sm text-blue-600 hover:text-blue-800" href="/movies" { "All movies" }
                    }

                    (search_form(option, keyword))

                    @if keyword.is_empty() {
                        p class="mt-10 text-gray-600" { "Pick a field and enter a keyword." }
                    } @else if views.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" {
                                "Nothing matches " span class="font-medium" { (keyword) } "."
                            }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for view in views {
                                (movie_card(view))
                            }
                        }
                    }

                    (nav_links(nav))
                }
            }
        },
    )
}

pub fn movie_detail_page(view: &MovieView, reviews: &[&Review], form_error: Option<&str>) -> String {
    page(
        &view.title,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-3xl mx-auto px-6 py-10" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href="/movies" { "Back to movies" }

                    div class="mt-4 bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" {
                            (view.title)
                            span class="ml-2 font-normal text-gray-500" { "(" (view.year) ")" }
                        }
                        p class="mt-2 text-sm text-gray-500" {
                            (view.running_time) " min · " (view.genre)
                        }
                        p class="mt-4 text-gray-700" { (view.description) }
                        dl class="mt-6 space-y-2 text-sm" {
                            div { dt class="inline font-semibold text-gray-700" { "Director: " } dd class="inline text-gray-700" { (view.director) } }
                            div { dt class="inline font-semibold text-gray-700" { "Cast: " } dd class="inline text-gray-700" { (view.actors) } }
                        }
                    }

                    div class="mt-8 bg-white shadow rounded-lg p-8" {
                        h2 class="text-xl font-semibold text-gray-900" { "Reviews" }
                        @if reviews.is_empty() {
                            p class="mt-4 text-gray-600" { "No reviews yet." }
                        } @else {
                            ul class="mt-4 space-y-4" {
                                @for review in reviews {
                                    (review_item(review))
                                }
                            }
                        }

                        form class="mt-8 space-y-4" method="post" action="/movie" {
                            input type="hidden" name="title" value=(view.title);
                            div {
                                label class="block text-sm font-medium text-gray-700" for="comment" { "Your review" }
                                textarea class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="comment" id="comment" rows="3" required {}
                            }
                            div {
                                label class="block text-sm font-medium text-gray-700" for="rating" { "Rating (1-10)" }
                                input class="mt-2 w-24 rounded-md border border-gray-300 px-3 py-2" type="number" name="rating" id="rating" min="1" max="10" value="10";
                            }
                            @if let Some(message) = form_error {
                                p class="text-sm text-red-600" { (message) }
                            }
                            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Submit" }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page(title: &str) -> String {
    page(
        "Not found",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Not found" }
                        p class="mt-4 text-gray-700" {
                            "No movie titled " span class="font-medium" { (title) } " in the catalogue."
                        }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/movies" { "Back" }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/movies" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_card(view: &MovieView) -> Markup {
    let detail_url = format!("/movie?title={}", urlencoding::encode(&view.title));
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            div class="flex items-start justify-between gap-4" {
                div {
                    h2 class="text-xl font-semibold text-gray-900" {
                        a class="hover:text-blue-700" href=(detail_url) { (view.title) }
                        span class="ml-2 font-normal text-gray-500" { "(" (view.year) ")" }
                    }
                    p class="mt-1 text-sm text-gray-500" {
                        (view.running_time) " min · " (view.genre)
                    }
                    p class="mt-2 text-sm text-gray-700" { (view.description) }
                    p class="mt-2 text-sm text-gray-500" {
                        (view.director) " · " (view.actors)
                    }
                }
            }
        }
    }
}

fn review_item(review: &Review) -> Markup {
    html! {
        li class="border-l-4 border-blue-500 pl-4" {
            p class="text-gray-700" { (review.review_text()) }
            p class="mt-1 text-sm text-gray-500" {
                @match review.rating() {
                    Some(rating) => { "Rated " (rating) "/10" }
                    None => { "Unrated" }
                }
                " · " (review.timestamp().strftime("%Y-%m-%d %H:%M"))
            }
        }
    }
}

fn search_form(option: SearchOption, keyword: &str) -> Markup {
    html! {
        form class="mt-8 flex flex-wrap items-end gap-4" method="post" action="/search" {
            div {
                label class="block text-sm font-medium text-gray-700" for="option" { "Field" }
                select class="mt-2 rounded-md border border-gray-300 px-3 py-2" name="option" id="option" {
                    @for choice in SearchOption::ALL {
                        option value=(choice.as_str()) selected[choice == option] { (choice.as_str()) }
                    }
                }
            }
            div class="grow" {
                label class="block text-sm font-medium text-gray-700" for="keyword" { "Keyword" }
                input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="keyword" id="keyword" value=(keyword) required;
            }
            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Search" }
        }
    }
}

fn nav_links(nav: &PageNav) -> Markup {
    html! {
        @if nav.first.is_some() || nav.next.is_some() {
            div class="mt-10 flex items-center justify-between text-sm" {
                div class="space-x-4" {
                    @if let Some(url) = &nav.first {
                        a class="text-blue-600 hover:text-blue-800" href=(url) { "First" }
                    }
                    @if let Some(url) = &nav.prev {
                        a class="text-blue-600 hover:text-blue-800" href=(url) { "Previous" }
                    }
                }
                div class="space-x-4" {
                    @if let Some(url) = &nav.next {
                        a class="text-blue-600 hover:text-blue-800" href=(url) { "Next" }
                    }
                    @if let Some(url) = &nav.last {
                        a class="text-blue-600 hover:text-blue-800" href=(url) { "Last" }
                    }
                }
            }
        }
    }
}

//! Read-only catalog endpoints: movies and shows.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::models::{MovieId, ShowId};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/shows", get(list_shows))
}

#[derive(Debug, Deserialize)]
struct MoviesQuery {
    genre: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct MovieResponse {
    id: MovieId,
    title: String,
    description: String,
    duration_minutes: u32,
    genres: Vec<String>,
    languages: Vec<String>,
}

async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesQuery>,
) -> impl IntoResponse {
    let movies: Vec<MovieResponse> = state
        .catalog
        .movies(params.genre.as_deref(), params.language.as_deref())
        .into_iter()
        .map(|m| MovieResponse {
            id: m.id,
            title: m.title.clone(),
            description: m.description.clone(),
            duration_minutes: m.duration_minutes,
            genres: m.genres.clone(),
            languages: m.languages.clone(),
        })
        .collect();
    Json(movies)
}

#[derive(Debug, Deserialize)]
struct ShowsQuery {
    movie_id: Option<MovieId>,
}

#[derive(Debug, Serialize)]
struct ShowResponse {
    id: ShowId,
    movie_id: MovieId,
    movie_title: String,
    theater: String,
    city: String,
    start_time: DateTime<Utc>,
    price_cents: i64,
    total_seats: u32,
}

async fn list_shows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShowsQuery>,
) -> Result<impl IntoResponse, BookingError> {
    if let Some(movie_id) = params.movie_id {
        if state.catalog.movie(movie_id).is_none() {
            return Err(BookingError::NotFound("movie"));
        }
    }
    let shows: Vec<ShowResponse> = state
        .catalog
        .shows(params.movie_id)
        .into_iter()
        .map(|s| ShowResponse {
            id: s.id,
            movie_id: s.movie_id,
            movie_title: state
                .catalog
                .movie(s.movie_id)
                .map(|m| m.title.clone())
                .unwrap_or_default(),
            theater: state
                .catalog
                .theater(s.theater_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            city: state
                .catalog
                .theater(s.theater_id)
                .map(|t| t.city.clone())
                .unwrap_or_default(),
            start_time: s.start_time,
            price_cents: s.price_cents,
            total_seats: s.total_seats(),
        })
        .collect();
    Ok(Json(shows))
}

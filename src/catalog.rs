//! Read-only reference data: movies, theaters and shows.
//!
//! Injected at startup and never mutated afterwards, so it needs no locking.
//! Seat state lives in the inventory store, not here.

use std::collections::HashMap;

use chrono::{Duration, NaiveTime, Utc};

use crate::models::{Movie, MovieId, Show, ShowId, Theater, TheaterId};

pub struct Catalog {
    movies: HashMap<MovieId, Movie>,
    theaters: HashMap<TheaterId, Theater>,
    shows: HashMap<ShowId, Show>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>, theaters: Vec<Theater>, shows: Vec<Show>) -> Self {
        Self {
            movies: movies.into_iter().map(|m| (m.id, m)).collect(),
            theaters: theaters.into_iter().map(|t| (t.id, t)).collect(),
            shows: shows.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn theater(&self, id: TheaterId) -> Option<&Theater> {
        self.theaters.get(&id)
    }

    pub fn show(&self, id: ShowId) -> Option<&Show> {
        self.shows.get(&id)
    }

    /// Movies, optionally filtered by genre and language (case-insensitive),
    /// sorted by id for stable output.
    pub fn movies(&self, genre: Option<&str>, language: Option<&str>) -> Vec<&Movie> {
        let mut result: Vec<&Movie> = self
            .movies
            .values()
            .filter(|m| match genre {
                Some(g) => m.genres.iter().any(|x| x.eq_ignore_ascii_case(g)),
                None => true,
            })
            .filter(|m| match language {
                Some(l) => m.languages.iter().any(|x| x.eq_ignore_ascii_case(l)),
                None => true,
            })
            .collect();
        result.sort_by_key(|m| m.id);
        result
    }

    /// Shows, optionally restricted to one movie, ordered by start time.
    pub fn shows(&self, movie_id: Option<MovieId>) -> Vec<&Show> {
        let mut result: Vec<&Show> = self
            .shows
            .values()
            .filter(|s| movie_id.map_or(true, |id| s.movie_id == id))
            .collect();
        result.sort_by_key(|s| (s.start_time, s.id));
        result
    }

    pub fn all_shows(&self) -> impl Iterator<Item = &Show> {
        self.shows.values()
    }

    /// Demo catalog: a handful of current movies, three theaters, and a week
    /// of 18:30 screenings. Every hall is 6 rows of 10 seats.
    pub fn seed() -> Self {
        let movies = vec![
            Movie {
                id: 1,
                title: "Play Dirty".into(),
                description: "A high-octane action thriller about a courier who uncovers a city-wide conspiracy.".into(),
                duration_minutes: 125,
                genres: vec!["Action".into(), "Thriller".into()],
                languages: vec!["English".into()],
            },
            Movie {
                id: 2,
                title: "28 Years Later".into(),
                description: "Survivors of the rage virus discover horrors that have mutated not only the infected but other survivors.".into(),
                duration_minutes: 155,
                genres: vec!["Sci-Fi".into()],
                languages: vec!["Hindi".into(), "English".into()],
            },
            Movie {
                id: 3,
                title: "Inspector Zende".into(),
                description: "Inspector Zende pursues a serial killer who escaped prison and returned to Mumbai.".into(),
                duration_minutes: 142,
                genres: vec!["Drama".into()],
                languages: vec!["Hindi".into()],
            },
            Movie {
                id: 4,
                title: "Coolie".into(),
                description: "A man's relentless quest for vengeance since youth, driven by righting past wrongs.".into(),
                duration_minutes: 138,
                genres: vec!["Action".into()],
                languages: vec!["English".into(), "Hindi".into()],
            },
            Movie {
                id: 5,
                title: "Superman".into(),
                description: "Superman must reconcile his alien Kryptonian heritage with his human upbringing.".into(),
                duration_minutes: 102,
                genres: vec!["Action".into()],
                languages: vec!["English".into(), "Hindi".into()],
            },
        ];

        let theaters = vec![
            Theater {
                id: 1,
                name: "CineMax Central".into(),
                city: "Srinagar".into(),
            },
            Theater {
                id: 2,
                name: "Galaxy Multiplex".into(),
                city: "Srinagar".into(),
            },
            Theater {
                id: 3,
                name: "Royal Cinemas".into(),
                city: "Srinagar".into(),
            },
        ];

        let mut shows = Vec::new();
        let mut show_id = 1;
        let evening = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        let today = Utc::now().date_naive();
        for movie in &movies {
            for theater in &theaters {
                for day_offset in 0..7 {
                    let date = today + Duration::days(day_offset);
                    shows.push(Show {
                        id: show_id,
                        movie_id: movie.id,
                        theater_id: theater.id,
                        start_time: date.and_time(evening).and_utc(),
                        price_cents: 25_000,
                        rows: 6,
                        seats_per_row: 10,
                    });
                    show_id += 1;
                }
            }
        }

        Self::new(movies, theaters, shows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_filter_is_case_insensitive() {
        let catalog = Catalog::seed();
        let thrillers = catalog.movies(Some("thriller"), None);
        assert_eq!(thrillers.len(), 1);
        assert_eq!(thrillers[0].title, "Play Dirty");
    }

    #[test]
    fn language_and_genre_filters_combine() {
        let catalog = Catalog::seed();
        let hits = catalog.movies(Some("action"), Some("hindi"));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn shows_filter_by_movie() {
        let catalog = Catalog::seed();
        // 3 theaters x 7 days per movie.
        assert_eq!(catalog.shows(Some(1)).len(), 21);
        assert_eq!(catalog.shows(None).len(), 105);
    }
}

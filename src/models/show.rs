use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, ShowId, TheaterId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theater {
    pub id: TheaterId,
    pub name: String,
    pub city: String,
}

/// A timed screening of a movie in a theater. Immutable after creation; the
/// seat layout is generated from `rows x seats_per_row` when the show is
/// loaded into the inventory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub movie_id: MovieId,
    pub theater_id: TheaterId,
    pub start_time: DateTime<Utc>,
    pub price_cents: i64,
    pub rows: u32,
    pub seats_per_row: u32,
}

impl Show {
    pub fn total_seats(&self) -> u32 {
        self.rows * self.seats_per_row
    }

    /// Row labels run A..Z, then AA, AB, ... for oversized halls.
    pub fn row_label(index: u32) -> String {
        let alphabet = b'Z' - b'A' + 1;
        if index < alphabet as u32 {
            ((b'A' + index as u8) as char).to_string()
        } else {
            let first = (index / alphabet as u32) - 1;
            let second = index % alphabet as u32;
            format!(
                "{}{}",
                (b'A' + first as u8) as char,
                (b'A' + second as u8) as char
            )
        }
    }
}

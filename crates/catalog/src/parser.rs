//! Parser for the cleaned catalog CSV files.
//!
//! - items file: one row per movie, header-driven (`id`/`movie_id`,
//!   `title`/`movie_title`, categories as one-hot columns or a `genres` list)
//! - observations file: `user_id,movie_id,rating[,timestamp]`
//!
//! Both files carry a header row and are read with the `csv` crate, so quoted
//! fields may contain commas, `""` escapes and line breaks.

use crate::error::{CatalogError, Result};
use crate::index::{MAX_RELEASE_YEAR, MIN_RELEASE_YEAR};
use crate::types::*;
use csv::{ErrorKind, ReaderBuilder, StringRecord};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Category columns used by one-hot encoded item files
pub const ONE_HOT_CATEGORIES: [&str; 18] = [
    "Action",
    "Adventure",
    "Animation",
    "Children",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Film-Noir",
    "Horror",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "War",
    "Western",
];

/// Placeholder some exports use for uncategorized items
const NO_GENRES_PLACEHOLDER: &str = "(no genres listed)";

/// Parse every record of a CSV file, returning its header and the records
/// paired with the line each one starts on.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; titles in older
/// exports are frequently Latin-1.
fn read_records(path: &Path) -> Result<Option<(Header, Vec<(usize, StringRecord)>)>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = file_label(path);
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let names = reader.headers().map_err(|e| csv_error(&file, e))?.clone();
    if names.is_empty() {
        return Ok(None);
    }
    let header = Header::new(&file, &names);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(&file, e))?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        // Rows made only of empty fields carry no record
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push((line, record));
    }
    Ok(Some((header, records)))
}

/// Translate a reader error into the catalog's error type
fn csv_error(file: &str, err: csv::Error) -> CatalogError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        ErrorKind::Io(e) => CatalogError::IoError(e),
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => CatalogError::FieldCountMismatch {
            expected: expected_len as usize,
            found: len as usize,
            line: pos.map_or(line, |p| p.line() as usize),
        },
        _ => CatalogError::ParseError {
            file: file.to_string(),
            line,
            reason,
        },
    }
}

/// Column positions taken from a header row
struct Header {
    file: String,
    columns: HashMap<String, usize>,
}

impl Header {
    fn new(file: &str, names: &StringRecord) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();
        Self {
            file: file.to_string(),
            columns,
        }
    }

    /// First column present out of several accepted spellings
    fn find(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|name| self.columns.get(*name).copied())
    }

    fn require(&self, candidates: &[&str]) -> Result<usize> {
        self.find(candidates)
            .ok_or_else(|| CatalogError::MissingColumn {
                file: self.file.clone(),
                candidates: candidates.join(", "),
            })
    }
}

/// Trimmed, non-empty field value; pandas writes missing values as "" or "nan"
fn optional_field(record: &StringRecord, column: Option<usize>) -> Option<&str> {
    let value = record.get(column?)?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value)
    }
}

fn required_field<'a>(
    record: &'a StringRecord,
    column: usize,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    optional_field(&record, Some(column)).ok_or_else(|| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

/// Parse an integer column, accepting float spellings such as "1995.0"
fn parse_integer<T: TryFrom<i64>>(raw: &str, file: &str, line: usize, column: &str) -> Result<T> {
    let error = || CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", column, raw),
    };

    let value = match raw.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let float: f64 = raw.parse().map_err(|_| error())?;
            if !float.is_finite() || float.fract() != 0.0 {
                return Err(error());
            }
            float as i64
        }
    };
    T::try_from(value).map_err(|_| error())
}

fn parse_float(raw: &str, file: &str, line: usize, column: &str) -> Result<f32> {
    raw.parse().map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", column, e),
    })
}

/// Parse the items file
pub fn parse_items(path: &Path) -> Result<Vec<Item>> {
    let file = file_label(path);
    let Some((header, records)) = read_records(path)? else {
        return Ok(Vec::new());
    };

    let id_col = header.require(&["id", "movie_id"])?;
    let title_col = header.require(&["title", "movie_title"])?;
    let year_col = header.find(&["release_year"]);
    let rating_col = header.find(&["rating"]);
    let imdb_col = header.find(&["IMDb_URL", "imdb_url"]);
    let poster_col = header.find(&["poster_url"]);
    let plot_col = header.find(&["plot"]);
    let director_col = header.find(&["director"]);
    let runtime_col = header.find(&["runtime"]);
    let genres_col = header.find(&["genres"]);
    let one_hot: Vec<(&str, usize)> = ONE_HOT_CATEGORIES
        .iter()
        .filter_map(|&name| header.find(&[name]).map(|idx| (name, idx)))
        .collect();

    let mut items = Vec::new();
    for (line_no, record) in records {
        let id_raw = required_field(&record, id_col, &file, line_no, "id")?;
        let title = record.get(title_col).unwrap_or_default().trim().to_string();

        // One-hot columns win; the free-text list is the fallback
        let mut categories: BTreeSet<String> = one_hot
            .iter()
            .filter(|(_, col)| {
                optional_field(&record, Some(*col))
                    .and_then(|v| v.parse::<f64>().ok())
                    .is_some_and(|v| v == 1.0)
            })
            .map(|(name, _)| name.to_string())
            .collect();
        if categories.is_empty() {
            if let Some(raw) = optional_field(&record, genres_col) {
                categories = parse_categories(raw);
            }
        }

        let year = match optional_field(&record, year_col) {
            Some(raw) => Some(parse_integer(raw, &file, line_no, "release_year")?),
            None => extract_year_from_title(&title),
        };

        let item = Item {
            id: parse_integer(id_raw, &file, line_no, "id")?,
            year,
            categories,
            quality_rating: optional_field(&record, rating_col)
                .map(|raw| parse_float(raw, &file, line_no, "rating"))
                .transpose()?,
            imdb_url: optional_field(&record, imdb_col).map(str::to_string),
            poster_url: optional_field(&record, poster_col).map(str::to_string),
            plot: optional_field(&record, plot_col).map(str::to_string),
            director: optional_field(&record, director_col).map(str::to_string),
            runtime_minutes: optional_field(&record, runtime_col)
                .map(|raw| parse_integer(raw, &file, line_no, "runtime"))
                .transpose()?,
            title,
        };

        items.push(item);
    }
    Ok(items)
}

/// Parse the observations file
pub fn parse_observations(path: &Path) -> Result<Vec<Observation>> {
    let file = file_label(path);
    let Some((header, records)) = read_records(path)? else {
        return Ok(Vec::new());
    };

    let requester_col = header.require(&["user_id"])?;
    let item_col = header.require(&["movie_id"])?;
    let rating_col = header.require(&["rating"])?;
    let timestamp_col = header.find(&["timestamp"]);

    let mut observations = Vec::new();
    for (line_no, record) in records {
        let requester_raw = required_field(&record, requester_col, &file, line_no, "user_id")?;
        let item_raw = required_field(&record, item_col, &file, line_no, "movie_id")?;
        let rating_raw = required_field(&record, rating_col, &file, line_no, "rating")?;

        let observation = Observation {
            requester_id: parse_integer(requester_raw, &file, line_no, "user_id")?,
            item_id: parse_integer(item_raw, &file, line_no, "movie_id")?,
            rating: parse_float(rating_raw, &file, line_no, "rating")?,
            timestamp: optional_field(&record, timestamp_col)
                .map(|raw| parse_integer(raw, &file, line_no, "timestamp"))
                .transpose()?,
        };

        observations.push(observation);
    }
    Ok(observations)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract year from an item title
///
/// Only a four-digit number inside the last parentheses that falls in the
/// accepted release range counts.
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Rocky (2)" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start >= end {
        return None;
    }
    let text = title[start + 1..end].trim();
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u16>()
        .ok()
        .filter(|year| (MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(year))
}

/// Split a free-text category list on '|' (or ',' when no pipe is present)
///
/// Example: "Action|Adventure|Sci-Fi" -> {"Action", "Adventure", "Sci-Fi"}
fn parse_categories(s: &str) -> BTreeSet<String> {
    let separator = if s.contains('|') { '|' } else { ',' };
    s.split(separator)
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES_PLACEHOLDER)
        .map(str::to_string)
        .collect()
}

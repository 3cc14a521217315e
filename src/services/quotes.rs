use crate::config::QuoteMode;
use crate::models::errors::SystemError;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const NO_QUOTES: &str =
    "these were not AI generated, ill let it do my programming but i. dont. let. it. do. my. banter.";
pub const UNREADABLE_QUOTES: &str = "so easy a stoned loser could do it";

/// Picks the quote of the moment from the first quotes file that exists.
pub struct QuoteSelector {
    paths: Vec<PathBuf>,
    mode: QuoteMode,
}

impl QuoteSelector {
    pub fn new(paths: Vec<PathBuf>, mode: QuoteMode) -> Self {
        Self { paths, mode }
    }

    pub async fn select(&self, today: NaiveDate) -> String {
        let Some(path) = first_existing(&self.paths).await else {
            debug!("No quotes file found");
            return NO_QUOTES.to_string();
        };

        match load_quotes(path).await {
            Ok(quotes) => choose(&quotes, self.mode, today).unwrap_or_else(|| NO_QUOTES.to_string()),
            Err(e) => {
                warn!("{} ({})", e, path.display());
                UNREADABLE_QUOTES.to_string()
            }
        }
    }
}

async fn first_existing(paths: &[PathBuf]) -> Option<&Path> {
    for path in paths {
        if fs::metadata(path).await.is_ok() {
            return Some(path);
        }
    }
    None
}

async fn load_quotes(path: &Path) -> Result<Vec<String>, SystemError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|_| SystemError::QuotesUnreadable)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn choose(quotes: &[String], mode: QuoteMode, today: NaiveDate) -> Option<String> {
    let picked = match mode {
        QuoteMode::Random => quotes.choose(&mut rand::thread_rng()),
        QuoteMode::Daily => {
            let seed = today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64;
            quotes.choose(&mut StdRng::seed_from_u64(seed))
        }
    };
    picked.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quotes_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_first_existing_path_is_used() {
        let file = quotes_file("\n  only one quote  \n\n");
        let selector = QuoteSelector::new(
            vec![PathBuf::from("/no/such/quotes.txt"), file.path().to_path_buf()],
            QuoteMode::Random,
        );
        assert_eq!(selector.select(day(1)).await, "only one quote");
    }

    #[tokio::test]
    async fn test_missing_or_empty_file_falls_back() {
        let selector = QuoteSelector::new(vec![PathBuf::from("/no/such/quotes.txt")], QuoteMode::Random);
        assert_eq!(selector.select(day(1)).await, NO_QUOTES);

        let file = quotes_file("\n   \n");
        let selector = QuoteSelector::new(vec![file.path().to_path_buf()], QuoteMode::Random);
        assert_eq!(selector.select(day(1)).await, NO_QUOTES);
    }

    #[tokio::test]
    async fn test_unreadable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let selector = QuoteSelector::new(vec![dir.path().to_path_buf()], QuoteMode::Random);
        assert_eq!(selector.select(day(1)).await, UNREADABLE_QUOTES);
    }

    #[tokio::test]
    async fn test_daily_mode_is_stable_within_a_day() {
        let file = quotes_file("one\ntwo\nthree\nfour\nfive\nsix\nseven\n");
        let selector = QuoteSelector::new(vec![file.path().to_path_buf()], QuoteMode::Daily);
        let first = selector.select(day(18)).await;
        for _ in 0..10 {
            assert_eq!(selector.select(day(18)).await, first);
        }
    }

    #[tokio::test]
    async fn test_random_mode_picks_from_file() {
        let file = quotes_file("alpha\nbeta\n");
        let selector = QuoteSelector::new(vec![file.path().to_path_buf()], QuoteMode::Random);
        for _ in 0..10 {
            let quote = selector.select(day(1)).await;
            assert!(quote == "alpha" || quote == "beta");
        }
    }
}

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use std::fmt;

/// Fixed topic for news days. Market topics carry the snapshot date,
/// see `MarketSnapshot::topic`.
pub const NEWS_TOPIC: &str = "Global Financial Market News & Updates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Sunday and Monday: scraped headlines
    News,
    /// Tuesday through Saturday: the previous session's index data
    Market,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::News => write!(f, "NEWS"),
            Mode::Market => write!(f, "MARKET"),
        }
    }
}

pub fn select_mode(date: NaiveDate) -> Mode {
    match date.weekday() {
        Weekday::Sun | Weekday::Mon => Mode::News,
        _ => Mode::Market,
    }
}

/// Calendar date "now" in the configured timezone
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

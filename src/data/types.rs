use chrono::NaiveDate;
use serde::Serialize;

pub const OVERVIEW_INSTRUCTION: &str = "Could not scrape specific headlines. Please generate a general market overview based on recent global financial events.";
pub const NEWS_UNAVAILABLE: &str = "Error fetching news.";

/// One daily OHLCV bar, dated in the exchange's local calendar
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub change: f64,
    pub change_percent: f64,
}

impl MarketSnapshot {
    /// Summarize the last two bars. A single bar is compared against itself;
    /// an empty series yields `None`.
    pub fn from_bars(bars: &[DailyBar]) -> Option<Self> {
        let last = bars.last()?;
        let prev = if bars.len() > 1 { &bars[bars.len() - 2] } else { last };

        let change = last.close - prev.close;
        let change_percent = if prev.close != 0.0 {
            change / prev.close * 100.0
        } else {
            0.0
        };

        Some(Self {
            date: last.date,
            close: round2(last.close),
            open: round2(last.open),
            high: round2(last.high),
            low: round2(last.low),
            volume: last.volume,
            change: round2(change),
            change_percent: round2(change_percent),
        })
    }

    pub fn topic(&self, display_name: &str) -> String {
        format!("{} Market Review ({})", display_name, self.date.format("%Y-%m-%d"))
    }

    /// Data block handed to the content generator
    pub fn to_context(&self) -> String {
        format!(
            "Date: {}\nClose: {}\nOpen: {}\nHigh: {}\nLow: {}\nVolume: {}\nChange: {} ({}%)",
            self.date.format("%Y-%m-%d"),
            self.close,
            self.open,
            self.high,
            self.low,
            self.volume,
            self.change,
            self.change_percent,
        )
    }
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub headline: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsDigest {
    Headlines(Vec<NewsItem>),
    /// Nothing matched; ask the generator for a general overview instead
    Overview,
    /// Transport or parse failure; the run continues in degraded form
    Unavailable,
}

impl NewsDigest {
    pub fn to_context(&self) -> String {
        match self {
            NewsDigest::Headlines(items) => items
                .iter()
                .map(|item| format!("- {} ({})", item.headline, item.link))
                .collect::<Vec<_>>()
                .join("\n"),
            NewsDigest::Overview => OVERVIEW_INSTRUCTION.to_string(),
            NewsDigest::Unavailable => NEWS_UNAVAILABLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 3.0,
            close,
            volume: 1_000_000 + day as u64,
        }
    }

    #[test]
    fn test_two_bar_change() {
        let snapshot = MarketSnapshot::from_bars(&[bar(15, 200.0), bar(16, 203.0)]).unwrap();

        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(snapshot.close, 203.0);
        assert_eq!(snapshot.change, 3.0);
        assert_eq!(snapshot.change_percent, 1.5);
        assert_eq!(snapshot.volume, 1_000_016);
    }

    #[test]
    fn test_uses_only_last_two_bars() {
        let bars = [bar(13, 50.0), bar(14, 400.0), bar(15, 100.0), bar(16, 98.0)];
        let snapshot = MarketSnapshot::from_bars(&bars).unwrap();

        assert_eq!(snapshot.change, -2.0);
        assert_eq!(snapshot.change_percent, -2.0);
    }

    #[test]
    fn test_change_is_rounded_to_two_decimals() {
        let snapshot = MarketSnapshot::from_bars(&[bar(15, 17_000.0), bar(16, 17_123.456)]).unwrap();

        assert_eq!(snapshot.close, 17_123.46);
        assert_eq!(snapshot.change, 123.46);
        // 123.456 / 17000 * 100 = 0.7262...
        assert_eq!(snapshot.change_percent, 0.73);
    }

    #[test]
    fn test_single_bar_compares_against_itself() {
        let snapshot = MarketSnapshot::from_bars(&[bar(16, 150.0)]).unwrap();

        assert_eq!(snapshot.change, 0.0);
        assert_eq!(snapshot.change_percent, 0.0);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert_eq!(MarketSnapshot::from_bars(&[]), None);
    }

    #[test]
    fn test_topic_and_context() {
        let snapshot = MarketSnapshot::from_bars(&[bar(15, 100.0), bar(16, 101.5)]).unwrap();

        assert_eq!(snapshot.topic("Nasdaq"), "Nasdaq Market Review (2026-10-16)");

        let context = snapshot.to_context();
        assert!(context.starts_with("Date: 2026-10-16\n"));
        assert!(context.contains("Close: 101.5\n"));
        assert!(context.ends_with("Change: 1.5 (1.5%)"));
    }

    #[test]
    fn test_digest_context() {
        let digest = NewsDigest::Headlines(vec![
            NewsItem { headline: "Stocks rally".to_string(), link: "https://a.example/1".to_string() },
            NewsItem { headline: "Bonds slip".to_string(), link: "#".to_string() },
        ]);

        assert_eq!(
            digest.to_context(),
            "- Stocks rally (https://a.example/1)\n- Bonds slip (#)"
        );
        assert_eq!(NewsDigest::Overview.to_context(), OVERVIEW_INSTRUCTION);
        assert_eq!(NewsDigest::Unavailable.to_context(), "Error fetching news.");
    }
}

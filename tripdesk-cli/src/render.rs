use std::fmt::{self, Display, Formatter};

use tripdesk_core::{
    MarketReport, TripReport,
    model::{IndexBar, IndexSection, RatesSection},
};

/// Capitalizes the first letter of every word, lowercasing the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

fn heading(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n== {title} ==")
}

pub struct TripView<'a>(pub &'a TripReport);

impl Display for TripView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;

        heading(f, &format!("Current Weather in {}", report.city))?;
        writeln!(
            f,
            "{}, {:.1}°C",
            title_case(&report.current.description),
            report.current.temperature_c
        )?;

        heading(f, "Weather Forecast")?;
        if report.forecast.is_empty() {
            writeln!(f, "No midday forecast available.")?;
        }
        for entry in &report.forecast {
            writeln!(f, "{}: {:.1}°C, {}", entry.dt_txt, entry.temperature_c, entry.description)?;
        }

        heading(f, "Trip Plan")?;
        writeln!(f, "{}", report.plan.trim_end())?;

        heading(f, "Hotels & Attractions")?;
        writeln!(f, "View on Google Maps: {}", report.hotels_link)
    }
}

pub struct MarketView<'a>(pub &'a MarketReport);

impl Display for MarketView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;

        heading(f, &format!("Financial Overview: {}", report.country))?;
        writeln!(f, "{}", report.overview.trim_end())?;

        if let Some(rates) = &report.rates {
            write_rates(f, rates)?;
        }

        if let Some(index) = &report.index {
            write_index(f, index)?;
        }

        heading(f, "Stock Exchange HQ")?;
        writeln!(f, "View on Google Maps: {}", report.exchange_link)
    }
}

fn write_rates(f: &mut Formatter<'_>, section: &RatesSection) -> fmt::Result {
    match &section.outcome {
        Ok(conversions) => {
            heading(f, "Exchange Rates")?;
            for c in conversions {
                match c.rate {
                    Some(rate) => writeln!(f, "1 {} → {rate} {}", section.base, c.target)?,
                    None => writeln!(f, "1 {} → unavailable {}", section.base, c.target)?,
                }
            }
            Ok(())
        }
        Err(err) => writeln!(f, "\nExchange API Error: {err}"),
    }
}

fn write_index(f: &mut Formatter<'_>, section: &IndexSection) -> fmt::Result {
    heading(f, &format!("Stock Index (Recent) {}", section.ticker))?;
    match &section.outcome {
        Ok(bars) if bars.is_empty() => writeln!(f, "No trading data for {} today.", section.ticker),
        Ok(bars) => write_bars(f, bars),
        Err(err) => writeln!(f, "Stock index error: {err}"),
    }
}

fn write_bars(f: &mut Formatter<'_>, bars: &[IndexBar]) -> fmt::Result {
    writeln!(
        f,
        "{:<20} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    )?;
    for bar in bars {
        let volume = bar.volume.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "{:<20} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14}",
            bar.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            volume
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tripdesk_core::{
        Error,
        model::{Conversion, ForecastEntry, WeatherReading},
    };

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(title_case("thunderstorm with heavy-rain"), "Thunderstorm With Heavy-Rain");
    }

    #[test]
    fn trip_view_lists_sections() {
        let report = TripReport {
            city: "Rome".into(),
            current: WeatherReading {
                location_name: Some("Rome".into()),
                description: "scattered clouds".into(),
                temperature_c: 21.0,
            },
            forecast: vec![ForecastEntry {
                dt_txt: "2024-05-01 12:00:00".into(),
                temperature_c: 23.46,
                description: "clear sky".into(),
            }],
            plan: "Day 1: Colosseum\n".into(),
            hotels_link: "https://www.google.com/maps/search/hotels+in+Rome".into(),
        };

        let out = TripView(&report).to_string();
        assert!(out.contains("Scattered Clouds, 21.0°C"));
        assert!(out.contains("2024-05-01 12:00:00: 23.5°C, clear sky"));
        assert!(out.contains("Day 1: Colosseum"));
        assert!(out.contains("hotels+in+Rome"));
    }

    #[test]
    fn market_view_shows_rates_error_and_table() {
        let report = MarketReport {
            country: "Japan".into(),
            overview: "Currency: JPY".into(),
            rates: Some(RatesSection {
                base: "JPY".into(),
                outcome: Err(Error::Api("invalid-key".into())),
            }),
            index: Some(IndexSection {
                ticker: "^N225",
                outcome: Ok(vec![IndexBar {
                    timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                    open: 38000.0,
                    high: 38500.0,
                    low: 37900.0,
                    close: 38274.05,
                    volume: None,
                }]),
            }),
            exchange_link: "https://www.google.com/maps/search/stock+exchange+Japan".into(),
        };

        let out = MarketView(&report).to_string();
        assert!(out.contains("Exchange API Error: invalid-key"));
        assert!(out.contains("2024-05-01 00:00 UTC"));
        assert!(out.contains("38274.05"));
        assert!(out.contains("stock+exchange+Japan"));
    }

    #[test]
    fn market_view_lists_conversions() {
        let report = MarketReport {
            country: "India".into(),
            overview: "INR".into(),
            rates: Some(RatesSection {
                base: "INR".into(),
                outcome: Ok(vec![
                    Conversion { target: "USD", rate: Some(0.012) },
                    Conversion { target: "GBP", rate: None },
                ]),
            }),
            index: None,
            exchange_link: String::new(),
        };

        let out = MarketView(&report).to_string();
        assert!(out.contains("1 INR → 0.012 USD"));
        assert!(out.contains("1 INR → unavailable GBP"));
        assert!(!out.contains("Stock Index"));
    }
}

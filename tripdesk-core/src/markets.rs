/// Country name → headline stock index ticker.
const INDEX_TICKERS: &[(&str, &str)] = &[
    ("Japan", "^N225"),
    ("India", "^BSESN"),
    ("United States", "^GSPC"),
    ("US", "^GSPC"),
    ("UK", "^FTSE"),
    ("China", "000001.SS"),
    ("South Korea", "^KS11"),
];

/// Exact, case-sensitive lookup of a country's index ticker.
pub fn index_ticker(country: &str) -> Option<&'static str> {
    INDEX_TICKERS.iter().find(|(name, _)| *name == country).map(|(_, ticker)| *ticker)
}

const MAPS_SEARCH: &str = "https://www.google.com/maps/search/";

/// Google Maps search for hotels in `city`.
pub fn hotels_link(city: &str) -> String {
    format!("{MAPS_SEARCH}hotels+in+{}", city.replace(' ', "+"))
}

/// Google Maps search for the stock exchange of `country`.
pub fn stock_exchange_link(country: &str) -> String {
    format!("{MAPS_SEARCH}stock+exchange+{}", country.replace(' ', "+"))
}

use tracing::info;

use crate::{
    credentials::{CredentialKind, Credentials},
    error::Result,
    markets::hotels_link,
    model::{ForecastEntry, TripReport, TripRequest},
    provider::Services,
};

/// Forecast entries are sampled once per day at this time of day.
pub const FORECAST_HOUR_MARKER: &str = "12:00:00";

pub const MIN_TRIP_DAYS: u8 = 1;
pub const MAX_TRIP_DAYS: u8 = 7;
pub const DEFAULT_TRIP_DAYS: u8 = 3;

pub const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub fn trip_prompt(req: &TripRequest) -> String {
    format!(
        "Plan a {}-day trip to {} in {}.\n\
         Include:\n\
         - Cultural and historical significance\n\
         - Day-wise itinerary\n\
         - Travel tips\n",
        req.days, req.city, req.month
    )
}

/// Keeps at most `days` midday entries, in forecast order.
pub fn midday_forecast(entries: Vec<ForecastEntry>, days: u8) -> Vec<ForecastEntry> {
    entries
        .into_iter()
        .filter(|e| e.dt_txt.contains(FORECAST_HOUR_MARKER))
        .take(usize::from(days))
        .collect()
}

/// Weather, forecast and an LLM-written itinerary for one city.
///
/// Aborts on a missing key, an unknown city, or any weather/LLM failure.
pub async fn plan_trip(services: &Services, creds: &Credentials, req: &TripRequest) -> Result<TripReport> {
    let llm_key = creds.require(CredentialKind::Llm)?;
    let weather_key = creds.require(CredentialKind::Weather)?;

    info!(city = %req.city, days = req.days, month = %req.month, "planning trip");

    let current = services.weather.current(weather_key, &req.city).await?;
    let forecast = services.weather.forecast(weather_key, &req.city).await?;
    let forecast = midday_forecast(forecast, req.days);

    let plan = services.llm.complete(llm_key, &trip_prompt(req)).await?;

    Ok(TripReport {
        city: req.city.clone(),
        current,
        forecast,
        plan,
        hotels_link: hotels_link(&req.city),
    })
}

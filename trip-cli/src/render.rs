//! Human-friendly output for a [`QueryResult`].

use trip_core::QueryResult;

pub fn render_result(result: &QueryResult) -> String {
    let mut out = format!("{}\n", result.location);

    if let Some(weather) = &result.weather {
        out.push_str(&format!("  Temperature:    {:.1}°C\n", weather.temperature_c));
        out.push_str(&format!("  Chance of rain: {}%\n", weather.rain_probability_pct));
    }

    match result.places.as_deref() {
        Some([]) => out.push_str("  No notable places found nearby.\n"),
        Some(places) => {
            out.push_str("  Places to visit:\n");
            for (i, name) in places.iter().enumerate() {
                out.push_str(&format!("    {}. {name}\n", i + 1));
            }
        }
        None => {}
    }

    out
}

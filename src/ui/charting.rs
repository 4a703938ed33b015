use retype::stats::WpmSample;

/// X (seconds) and Y (wpm) bounds for the results chart.
///
/// The x axis runs to the last sampled second, or the configured duration
/// when the session ended before the first tick.
pub fn compute_chart_params(samples: &[WpmSample], duration_seconds: u64) -> (f64, f64) {
    let highest_wpm = samples.iter().map(|s| s.wpm).fold(0.0, f64::max);

    let overall_duration = samples
        .last()
        .map_or(duration_seconds, |s| s.second)
        .max(1) as f64;

    (overall_duration, highest_wpm.round())
}

/// Format an axis label, dropping the fraction for whole numbers
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

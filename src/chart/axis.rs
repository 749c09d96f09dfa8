use chrono::Datelike;

use crate::core::primitives::unix_seconds_to_datetime;

/// Round tick values inside `[min, max]`, roughly `target_count` of them.
///
/// Returns the ticks and the number of decimals needed to label them.
#[must_use]
pub fn price_ticks(min: f64, max: f64, target_count: usize) -> (Vec<f64>, usize) {
    if !min.is_finite() || !max.is_finite() || max <= min || target_count == 0 {
        return (Vec::new(), 0);
    }

    let step = nice_step((max - min) / target_count as f64);
    let first = (min / step).ceil() * step;
    let ticks = (0_u32..)
        .map(|i| first + f64::from(i) * step)
        .take_while(|value| *value <= max + step * 1e-9)
        .take(target_count * 2 + 1)
        .collect();
    (ticks, decimals_for_step(step))
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10_f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn decimals_for_step(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    }
}

#[must_use]
pub fn format_price(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Day-level label; the first day of a year is labelled with the year.
#[must_use]
pub fn time_label(time: i64) -> Option<String> {
    let datetime = unix_seconds_to_datetime(time)?;
    if datetime.month() == 1 && datetime.day() == 1 {
        return Some(datetime.format("%Y").to_string());
    }
    Some(datetime.format("%b %d").to_string())
}

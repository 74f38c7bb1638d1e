//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Renders a star rating out of five, e.g. `★★★★☆`.
///
/// Usage in templates: `{{ product.rating.rate|stars }}`
#[askama::filter_fn]
pub fn stars(rate: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let rate: f64 = rate.to_string().parse().unwrap_or(0.0);
    Ok(star_string(rate))
}

fn star_string(rate: f64) -> String {
    // Clamped to 0..=5 before the cast, so truncation cannot occur
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = rate.clamp(0.0, 5.0).round() as usize;
    let mut out = "★".repeat(full);
    out.push_str(&"☆".repeat(5 - full));
    out
}

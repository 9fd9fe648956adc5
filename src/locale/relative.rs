use chrono::NaiveDateTime;

use super::Locale;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn name(self, locale: Locale, plural: bool) -> &'static str {
        match (locale, self, plural) {
            (Locale::Es, Unit::Minute, false) => "minuto",
            (Locale::Es, Unit::Minute, true) => "minutos",
            (Locale::Es, Unit::Hour, false) => "hora",
            (Locale::Es, Unit::Hour, true) => "horas",
            (Locale::Es, Unit::Day, false) => "día",
            (Locale::Es, Unit::Day, true) => "días",
            (Locale::Es, Unit::Week, false) => "semana",
            (Locale::Es, Unit::Week, true) => "semanas",
            (Locale::Es, Unit::Month, false) => "mes",
            (Locale::Es, Unit::Month, true) => "meses",
            (Locale::Es, Unit::Year, false) => "año",
            (Locale::Es, Unit::Year, true) => "años",
            (Locale::En, Unit::Minute, false) => "minute",
            (Locale::En, Unit::Minute, true) => "minutes",
            (Locale::En, Unit::Hour, false) => "hour",
            (Locale::En, Unit::Hour, true) => "hours",
            (Locale::En, Unit::Day, false) => "day",
            (Locale::En, Unit::Day, true) => "days",
            (Locale::En, Unit::Week, false) => "week",
            (Locale::En, Unit::Week, true) => "weeks",
            (Locale::En, Unit::Month, false) => "month",
            (Locale::En, Unit::Month, true) => "months",
            (Locale::En, Unit::Year, false) => "year",
            (Locale::En, Unit::Year, true) => "years",
        }
    }
}

fn bucket(seconds: i64) -> Option<(i64, Unit)> {
    if seconds < MINUTE {
        None
    } else if seconds < HOUR {
        Some((seconds / MINUTE, Unit::Minute))
    } else if seconds < DAY {
        Some((seconds / HOUR, Unit::Hour))
    } else if seconds < WEEK {
        Some((seconds / DAY, Unit::Day))
    } else if seconds < MONTH {
        Some((seconds / WEEK, Unit::Week))
    } else if seconds < YEAR {
        Some((seconds / MONTH, Unit::Month))
    } else {
        Some((seconds / YEAR, Unit::Year))
    }
}

/// Renders how long ago `then` was, as seen from `now`.
///
/// Both values are local wall-clock times. Timestamps ahead of `now` (clock
/// changes, imported data) are phrased as future times instead of failing.
pub fn format_relative(then: NaiveDateTime, now: NaiveDateTime, locale: Locale) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let future = delta < 0;

    match (bucket(delta.abs()), locale, future) {
        (None, Locale::Es, false) => "hace un momento".to_string(),
        (None, Locale::Es, true) => "dentro de un momento".to_string(),
        (None, Locale::En, false) => "moments ago".to_string(),
        (None, Locale::En, true) => "moments from now".to_string(),
        (Some((amount, unit)), locale, future) => {
            let unit = unit.name(locale, amount != 1);
            match (locale, future) {
                (Locale::Es, false) => format!("hace {amount} {unit}"),
                (Locale::Es, true) => format!("dentro de {amount} {unit}"),
                (Locale::En, false) => format!("{amount} {unit} ago"),
                (Locale::En, true) => format!("in {amount} {unit}"),
            }
        }
    }
}

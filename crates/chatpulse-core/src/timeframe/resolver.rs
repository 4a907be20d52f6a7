use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub const DAY_DAYS: u32 = 1;
pub const WEEK_DAYS: u32 = 7;
pub const FORTNIGHT_DAYS: u32 = 15;
pub const MONTH_DAYS: u32 = 30;

/// Flat estimate once this year's December 31 is behind us.
pub const YEAR_FALLBACK_DAYS: u32 = 365;

const NAMED_MONTH_DAY: u32 = 15;
const MILLIS_PER_DAY: i64 = 86_400_000;

const SPELLED_QUANTITIES: [(&str, u32); 11] = [
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
    ("once", 11),
    ("doce", 12),
];

/// `quantity × unit_days`, or `None` when the quantity is neither a positive
/// integer nor a spelled-out number (the rule then does not match).
#[must_use]
pub fn multiplied_days(quantity: &str, unit_days: u32) -> Option<u32> {
    parse_quantity(quantity)
        .filter(|value| *value > 0)
        .and_then(|value| value.checked_mul(unit_days))
}

fn parse_quantity(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    raw.parse::<u32>().ok().or_else(|| {
        SPELLED_QUANTITIES
            .iter()
            .find(|(word, _)| *word == raw)
            .map(|&(_, value)| value)
    })
}

/// Days until December 31 (midnight UTC) of the current year. Falls back to
/// [`YEAR_FALLBACK_DAYS`] when that instant has already passed.
#[must_use]
pub fn days_until_end_of_year(now: DateTime<Utc>) -> Option<u32> {
    let target = midnight(now.year(), 12, 31)?;
    if target <= now {
        return Some(YEAR_FALLBACK_DAYS);
    }
    days_until(now, target)
}

/// Days until the next `month`/`day` strictly after `now`, rolling into the
/// following year when this year's date is not in the future.
#[must_use]
pub fn days_until_next_occurrence(now: DateTime<Utc>, month: u32, day: u32) -> Option<u32> {
    let this_year = midnight(now.year(), month, day)?;
    let target = if this_year > now {
        this_year
    } else {
        midnight(now.year() + 1, month, day)?
    };
    days_until(now, target)
}

/// Days until the 15th of the next future occurrence of `month`. Naming the
/// current month (or an earlier one) means next year's.
#[must_use]
pub fn days_until_named_month(now: DateTime<Utc>, month: u32) -> Option<u32> {
    let year = if month <= now.month() {
        now.year() + 1
    } else {
        now.year()
    };
    days_until(now, midnight(year, month, NAMED_MONTH_DAY)?)
}

/// Whole days from `now` to `target`, a partial day counting as a full one.
#[must_use]
pub fn days_until(now: DateTime<Utc>, target: DateTime<Utc>) -> Option<u32> {
    let millis = (target - now).num_milliseconds();
    if millis <= 0 {
        return None;
    }
    u32::try_from(div_ceil_positive(millis, MILLIS_PER_DAY)).ok()
}

fn div_ceil_positive(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}

fn midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

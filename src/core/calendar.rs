//! Statutory filing calendars.
//!
//! Due dates fall at 00:00 UTC on the computed calendar day. Every call works
//! from the `now` it is given; nothing here reads the clock.

use super::country::{builtin_registry, CountryCode, CountryRegistry};
use super::obligation::ObligationType;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days from `now` used when a country has no calendar for an obligation
pub const FALLBACK_DAYS: i64 = 30;

/// How the next due date of a periodic filing is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DueDateRule {
    /// Given day of next month, or of the month after if that is not after now
    DayOfNextMonth { day: u32 },
    /// Last day of the month `months_ahead` from now, rolling one month forward
    /// if that is not after now
    EndOfMonth { months_ahead: u32 },
    /// Fixed calendar date in the year following now
    DateNextYear { month: u32, day: u32 },
}

impl DueDateRule {
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        match *self {
            DueDateRule::DayOfNextMonth { day } => {
                let candidate = midnight(month_day(today, 1, day));
                if candidate > now {
                    candidate
                } else {
                    midnight(month_day(today, 2, day))
                }
            }
            DueDateRule::EndOfMonth { months_ahead } => {
                let candidate = midnight(month_end(today, months_ahead));
                if candidate > now {
                    candidate
                } else {
                    midnight(month_end(today, months_ahead + 1))
                }
            }
            DueDateRule::DateNextYear { month, day } => {
                midnight(clamped_date(today.year() + 1, month, day))
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let check_day = |day: u32| {
            if (1..=31).contains(&day) {
                Ok(())
            } else {
                Err(format!("day {} is outside 1-31", day))
            }
        };
        match *self {
            DueDateRule::DayOfNextMonth { day } => check_day(day),
            DueDateRule::EndOfMonth { months_ahead } if months_ahead > 120 => {
                Err(format!("months ahead {} is more than 120", months_ahead))
            }
            DueDateRule::EndOfMonth { .. } => Ok(()),
            DueDateRule::DateNextYear { month, day } => {
                if !(1..=12).contains(&month) {
                    return Err(format!("month {} is outside 1-12", month));
                }
                check_day(day)
            }
        }
    }
}

impl fmt::Display for DueDateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDateRule::DayOfNextMonth { day } => write!(f, "day {} of next month", day),
            DueDateRule::EndOfMonth { months_ahead } => {
                write!(f, "end of month +{}", months_ahead)
            }
            DueDateRule::DateNextYear { month, day } => {
                write!(f, "{:02}-{:02} next year", month, day)
            }
        }
    }
}

/// Due date used when no calendar is configured
pub fn fallback_due_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(FALLBACK_DAYS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Next due date per `(country, obligation)` calendar
pub struct DueDateCalculator<'r, R: CountryRegistry + ?Sized> {
    registry: &'r R,
}

impl<'r, R: CountryRegistry + ?Sized> DueDateCalculator<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        DueDateCalculator { registry }
    }

    pub fn next_due_date(
        &self,
        country: CountryCode,
        obligation: ObligationType,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let rule = self
            .registry
            .country(country)
            .and_then(|c| c.rule(obligation))
            .and_then(|r| r.due_date);
        let due = match rule {
            Some(rule) => rule.next_after(now),
            None => fallback_due_date(now),
        };
        log::debug!("{} {} due {} (rule {:?})", country, obligation, due, rule);
        due
    }
}

/// Next due date against the builtin registry
pub fn calculate_next_filing_date(
    country: CountryCode,
    obligation: ObligationType,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    DueDateCalculator::new(builtin_registry()).next_due_date(country, obligation, now)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// (year, month) `months` after the month containing `date`
fn shift_month(date: NaiveDate, months: u32) -> (i32, u32) {
    let index = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = index.div_euclid(12) as i32;
    let month = index.rem_euclid(12) as u32 + 1;
    (year, month)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(28, |d| d.day())
}

/// Calendar date with the day clamped to the length of the month
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let month = month.clamp(1, 12);
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}

fn month_day(date: NaiveDate, months_ahead: u32, day: u32) -> NaiveDate {
    let (year, month) = shift_month(date, months_ahead);
    clamped_date(year, month, day)
}

fn month_end(date: NaiveDate, months_ahead: u32) -> NaiveDate {
    let (year, month) = shift_month(date, months_ahead);
    clamped_date(year, month, days_in_month(year, month))
}

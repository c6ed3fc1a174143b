use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::reservation::ReservationInterval;

/// Every date covered by a current interval (end date not yet passed) for the
/// given vehicle, or across all vehicles when `vehicle` is `None`. Eagerly
/// materialized; overlapping bookings collapse in the set.
pub fn blocked_dates(
    intervals: &[ReservationInterval],
    vehicle: Option<&str>,
    today: NaiveDate,
) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();

    for interval in current_intervals(intervals, vehicle, today) {
        let mut day = interval.start_date;
        while day <= interval.end_date {
            dates.insert(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    dates
}

/// If today falls inside at least one current interval for the vehicle, the
/// latest end date among those intervals; `None` when today is free. Taking
/// the maximum resolves the tie-break across overlapping bookings.
pub fn blocked_until(
    intervals: &[ReservationInterval],
    vehicle: &str,
    today: NaiveDate,
) -> Option<NaiveDate> {
    current_intervals(intervals, Some(vehicle), today)
        .filter(|interval| interval.contains(today))
        .map(|interval| interval.end_date)
        .max()
}

pub fn is_blocked(
    intervals: &[ReservationInterval],
    vehicle: &str,
    date: NaiveDate,
    today: NaiveDate,
) -> bool {
    current_intervals(intervals, Some(vehicle), today).any(|interval| interval.contains(date))
}

fn current_intervals<'a>(
    intervals: &'a [ReservationInterval],
    vehicle: Option<&'a str>,
    today: NaiveDate,
) -> impl Iterator<Item = &'a ReservationInterval> {
    intervals
        .iter()
        .filter(move |interval| vehicle.map_or(true, |slug| interval.vehicle_slug == slug))
        .filter(move |interval| interval.is_current(today))
}

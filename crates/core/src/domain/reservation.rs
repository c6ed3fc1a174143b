use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional customer metadata attached to a booking by the operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One booked date interval for one vehicle, end date inclusive.
///
/// Intervals for the same vehicle may overlap; overlap is never validated.
/// Intervals are never edited in place: replacing one means removing it and
/// adding a new interval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationInterval {
    pub id: String,
    pub vehicle_slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
}

impl ReservationInterval {
    pub fn new(
        vehicle_slug: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vehicle_slug: vehicle_slug.into(),
            start_date,
            end_date,
            customer: None,
        }
    }

    pub fn with_customer(mut self, customer: CustomerRef) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// An interval stops blocking anything once its end date is in the past.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::ReservationInterval;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let interval = ReservationInterval::new("audi-r8-v8", date(2026, 3, 10), date(2026, 3, 12));
        assert!(interval.contains(date(2026, 3, 10)));
        assert!(interval.contains(date(2026, 3, 11)));
        assert!(interval.contains(date(2026, 3, 12)));
        assert!(!interval.contains(date(2026, 3, 9)));
        assert!(!interval.contains(date(2026, 3, 13)));
    }

    #[test]
    fn interval_is_current_until_its_end_has_passed() {
        let interval = ReservationInterval::new("audi-r8-v8", date(2026, 3, 10), date(2026, 3, 12));
        assert!(interval.is_current(date(2026, 3, 1)));
        assert!(interval.is_current(date(2026, 3, 12)));
        assert!(!interval.is_current(date(2026, 3, 13)));
    }
}

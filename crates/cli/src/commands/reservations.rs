use chrono::NaiveDate;

use rentora_core::domain::reservation::ReservationInterval;
use rentora_store::ReservationRepository;

use super::CommandResult;

pub fn list() -> CommandResult {
    let (_, store) = match super::open_store() {
        Ok(opened) => opened,
        Err(error) => {
            return CommandResult::failure("reservations.list", "config", error.to_string(), 1)
        }
    };

    let intervals = ReservationRepository::new(store).list();
    if intervals.is_empty() {
        return CommandResult::success("reservations.list", "no reservation intervals stored");
    }

    let lines = intervals
        .iter()
        .map(|interval| {
            format!(
                "{} {} {} -> {}",
                interval.id, interval.vehicle_slug, interval.start_date, interval.end_date
            )
        })
        .collect::<Vec<_>>()
        .join("; ");
    CommandResult::success("reservations.list", lines)
}

pub fn add(vehicle: &str, start: NaiveDate, end: NaiveDate) -> CommandResult {
    if end < start {
        return CommandResult::failure(
            "reservations.add",
            "validation",
            "end date must not precede start date",
            2,
        );
    }

    let (_, store) = match super::open_store() {
        Ok(opened) => opened,
        Err(error) => {
            return CommandResult::failure("reservations.add", "config", error.to_string(), 1)
        }
    };

    let interval = ReservationInterval::new(vehicle, start, end);
    let interval_id = interval.id.clone();
    if ReservationRepository::new(store).add(interval) {
        CommandResult::success("reservations.add", format!("added interval {interval_id}"))
    } else {
        CommandResult::failure("reservations.add", "storage", "could not persist interval", 1)
    }
}

pub fn remove(interval_id: &str) -> CommandResult {
    let (_, store) = match super::open_store() {
        Ok(opened) => opened,
        Err(error) => {
            return CommandResult::failure("reservations.remove", "config", error.to_string(), 1)
        }
    };

    if ReservationRepository::new(store).remove(interval_id) {
        CommandResult::success("reservations.remove", format!("removed interval {interval_id}"))
    } else {
        CommandResult::failure(
            "reservations.remove",
            "not_found",
            format!("no interval with id {interval_id}"),
            1,
        )
    }
}

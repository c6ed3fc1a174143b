use rentora_store::fixtures;
use rentora_store::store::Collection;

use super::CommandResult;

/// Write the deterministic demo reservations so a fresh install has data on
/// the availability calendar. Replaces the reservations collection wholesale;
/// the built-in fleet needs no seeding, it ships compiled in.
pub fn run() -> CommandResult {
    let (_, store) = match super::open_store() {
        Ok(opened) => opened,
        Err(error) => return CommandResult::failure("seed", "config", error.to_string(), 1),
    };

    let reservations = fixtures::demo_reservations();
    match store.write(Collection::Reservations, &reservations) {
        Ok(()) => CommandResult::success(
            "seed",
            format!("seeded {} demo reservation intervals", reservations.len()),
        ),
        Err(error) => CommandResult::failure("seed", "storage", error.to_string(), 1),
    }
}

use crate::domain::request::{RentalRequest, RequestStatus};
use crate::domain::vehicle::{slugify, Vehicle};

/// Assemble the public catalogue at read time.
///
/// Sources merge by slug in increasing precedence: the built-in base fleet,
/// operator overrides of base entries, admin-added vehicles, then projections
/// of accepted rental requests. Overrides only replace an existing base slug;
/// the other sources may also introduce new entries.
pub fn assemble_catalogue(
    base: &[Vehicle],
    overrides: &[Vehicle],
    admin: &[Vehicle],
    requests: &[RentalRequest],
) -> Vec<Vehicle> {
    let mut catalogue: Vec<Vehicle> = base.to_vec();

    for replacement in overrides {
        if let Some(existing) =
            catalogue.iter_mut().find(|vehicle| vehicle.slug == replacement.slug)
        {
            *existing = replacement.clone();
        }
    }

    for vehicle in admin {
        upsert(&mut catalogue, vehicle.clone());
    }

    for request in requests {
        if let Some(projection) = request_to_vehicle(request) {
            upsert(&mut catalogue, projection);
        }
    }

    catalogue
}

/// Project an accepted request into a vehicle-shaped catalogue entry.
///
/// This is a pure mapping, not a stored copy: the catalogue always reflects
/// the request's current operator-assigned pricing and display specs, and a
/// deleted request's entry disappears on the next read. Pending and rejected
/// requests, and accepted requests without assigned pricing, project to
/// nothing.
pub fn request_to_vehicle(request: &RentalRequest) -> Option<Vehicle> {
    if request.status != RequestStatus::Accepted {
        return None;
    }
    let pricing = request.pricing.clone()?;
    if pricing.is_empty() {
        return None;
    }

    let specs = request.display_specs.clone().unwrap_or_default();
    let description = &request.vehicle;

    Some(Vehicle {
        slug: slugify(&description.brand, &description.model),
        brand: description.brand.clone(),
        model: description.model.clone(),
        year: description.year,
        power_hp: specs.power_hp.unwrap_or(description.power_hp),
        transmission: specs.transmission.unwrap_or(description.transmission),
        category: specs.category.clone().unwrap_or_else(|| description.category.clone()),
        pricing,
        extra_km_rate: None,
        deposit_chf: 0,
        location: specs.location.clone().unwrap_or_else(|| description.location.clone()),
        media: request.photos.clone(),
        calendar_url: None,
    })
}

fn upsert(catalogue: &mut Vec<Vehicle>, vehicle: Vehicle) {
    match catalogue.iter_mut().find(|existing| existing.slug == vehicle.slug) {
        Some(existing) => *existing = vehicle,
        None => catalogue.push(vehicle),
    }
}

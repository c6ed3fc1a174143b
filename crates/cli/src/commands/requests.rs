use std::collections::BTreeMap;

use chrono::Utc;

use rentora_core::domain::vehicle::{DurationTier, TierPricing};
use rentora_core::workflow::RequestWorkflow;
use rentora_store::RequestRepository;

use super::CommandResult;

fn workflow() -> Result<RequestWorkflow<RequestRepository>, String> {
    let (_, store) = super::open_store().map_err(|error| error.to_string())?;
    Ok(RequestWorkflow::new(RequestRepository::new(store)))
}

pub fn list() -> CommandResult {
    let workflow = match workflow() {
        Ok(workflow) => workflow,
        Err(error) => return CommandResult::failure("requests.list", "config", error, 1),
    };

    let requests = workflow.list();
    if requests.is_empty() {
        return CommandResult::success("requests.list", "no rental requests stored");
    }

    let lines = requests
        .iter()
        .map(|request| {
            format!(
                "{} {:?} {} {} {}",
                request.id,
                request.status,
                request.depositor.email,
                request.vehicle.brand,
                request.vehicle.model
            )
        })
        .collect::<Vec<_>>()
        .join("; ");
    CommandResult::success("requests.list", lines)
}

pub fn accept(request_id: &str, pricing_json: &str) -> CommandResult {
    let pricing: BTreeMap<DurationTier, TierPricing> = match serde_json::from_str(pricing_json) {
        Ok(pricing) => pricing,
        Err(error) => {
            return CommandResult::failure(
                "requests.accept",
                "validation",
                format!("pricing is not a valid tier map: {error}"),
                2,
            )
        }
    };
    if pricing.is_empty() {
        return CommandResult::failure(
            "requests.accept",
            "validation",
            "pricing must contain at least one tier",
            2,
        );
    }

    let workflow = match workflow() {
        Ok(workflow) => workflow,
        Err(error) => return CommandResult::failure("requests.accept", "config", error, 1),
    };

    match workflow.accept(request_id, pricing, Utc::now()) {
        Some(request) => {
            CommandResult::success("requests.accept", format!("accepted request {}", request.id))
        }
        None => CommandResult::failure(
            "requests.accept",
            "not_found",
            format!("no pending request with id {request_id}"),
            1,
        ),
    }
}

pub fn reject(request_id: &str) -> CommandResult {
    let workflow = match workflow() {
        Ok(workflow) => workflow,
        Err(error) => return CommandResult::failure("requests.reject", "config", error, 1),
    };

    match workflow.reject(request_id, Utc::now()) {
        Some(request) => {
            CommandResult::success("requests.reject", format!("rejected request {}", request.id))
        }
        None => CommandResult::failure(
            "requests.reject",
            "not_found",
            format!("no pending request with id {request_id}"),
            1,
        ),
    }
}

pub fn delete(request_id: &str) -> CommandResult {
    let workflow = match workflow() {
        Ok(workflow) => workflow,
        Err(error) => return CommandResult::failure("requests.delete", "config", error, 1),
    };

    if workflow.delete(request_id) {
        CommandResult::success("requests.delete", format!("deleted request {request_id}"))
    } else {
        CommandResult::failure(
            "requests.delete",
            "not_found",
            format!("no request with id {request_id}"),
            1,
        )
    }
}

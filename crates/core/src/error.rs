use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Dependency cycle detected through features {}", format_cycle(.cycle))]
    DependencyCycle { cycle: Vec<DbId> },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Render a cycle as `1 -> 2 -> 3 -> 1`.
pub fn format_cycle(cycle: &[DbId]) -> String {
    let mut parts: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.to_string());
    }
    parts.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_closes_the_loop() {
        let err = CoreError::DependencyCycle {
            cycle: vec![3, 7, 9],
        };
        assert_eq!(
            err.to_string(),
            "Dependency cycle detected through features 3 -> 7 -> 9 -> 3"
        );
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Idea",
            id: 12,
        };
        assert_eq!(err.to_string(), "Entity not found: Idea with id 12");
    }
}

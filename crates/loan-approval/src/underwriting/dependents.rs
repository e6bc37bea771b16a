use super::domain::ValidationError;

/// Open-ended top bucket of the dependents field.
pub const MAX_DEPENDENTS_BUCKET: u8 = 3;

/// Parses the dependents field. `"3+"` collapses to 3; anything outside
/// `"0" | "1" | "2" | "3+"` is rejected.
pub fn normalize_dependents(raw: &str) -> Result<u8, ValidationError> {
    match raw.trim() {
        "0" => Ok(0),
        "1" => Ok(1),
        "2" => Ok(2),
        "3+" => Ok(MAX_DEPENDENTS_BUCKET),
        _ => Err(ValidationError::InvalidDependents {
            value: raw.to_string(),
        }),
    }
}

use crate::errors::DomainError;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;

/// Canonical form of a zone name: lower case, fully qualified.
///
/// `"."` is the root zone and matches every query name.
pub fn normalize_zone(zone: &str) -> Result<String, DomainError> {
    let trimmed = zone.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidZone("empty zone name".to_string()));
    }
    if trimmed == "." {
        return Ok(".".to_string());
    }

    let name = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidZone(format!(
            "'{}' exceeds {} octets",
            zone, MAX_NAME_LEN
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidZone(format!("'{}' has an empty label", zone)));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidZone(format!(
                "'{}' has a label longer than {} octets",
                zone, MAX_LABEL_LEN
            )));
        }
        if label.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::InvalidZone(format!(
                "'{}' contains whitespace",
                zone
            )));
        }
    }

    Ok(format!("{}.", name.to_ascii_lowercase()))
}

/// Parent of a normalized name, `None` once the root has been reached.
pub fn parent_zone(name: &str) -> Option<&str> {
    if name == "." {
        return None;
    }
    match name.find('.') {
        Some(pos) if pos + 1 < name.len() => Some(&name[pos + 1..]),
        _ => Some("."),
    }
}

//! UUID utilities

use uuid::Uuid;

use crate::{Error, Result};

/// Generate a new UUIDv4 record id
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse a record id, reporting malformed input as a bad request
pub fn parse(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| Error::bad_request(format!("Invalid id: {}", s)))
}

/// Parse an id read back from storage
pub fn parse_stored(column: &str, s: &str) -> Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| Error::Internal(format!("Corrupt {} value {:?}: {}", column, s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse("not-a-uuid"), Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_generate_is_parseable() {
        let id = generate();
        assert_eq!(parse(&id.to_string()).unwrap(), id);
    }
}

use crate::error::ApiError;

/// Path identifiers are validated before any database access; anything
/// non-numeric or negative is a 400.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    parse(raw).ok_or_else(|| ApiError::BadRequest("Invalid ID parameter.".into()))
}

/// Same rule for the `/products/category/:categoryId` segment, which carries
/// its own message text.
pub fn parse_category_id(raw: &str) -> Result<i32, ApiError> {
    parse(raw).ok_or_else(|| ApiError::BadRequest("Invalid category ID parameter.".into()))
}

fn parse(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|id| *id >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_integers() {
        assert_eq!(parse_id("0").unwrap(), 0);
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_category_id("7").unwrap(), 7);
    }

    #[test]
    fn rejects_non_numeric() {
        for raw in ["abc", "", "3.5", "1e3", "1x"] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.to_string(), "Invalid ID parameter.");
        }
    }

    #[test]
    fn rejects_negative() {
        assert!(parse_id("-1").is_err());
        assert!(parse_category_id("-10").is_err());
    }

    #[test]
    fn category_id_has_its_own_message() {
        let err = parse_category_id("nope").unwrap_err();
        assert_eq!(err.to_string(), "Invalid category ID parameter.");
    }
}

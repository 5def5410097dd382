//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a difficulty tag has the `<cols>x<rows>` shape with
/// non-zero dimensions.
///
/// # Examples
///
/// ```ignore
/// validate_difficulty("3x2")  // Ok
/// validate_difficulty("3×2")  // Err - not an ascii 'x'
/// validate_difficulty("0x4")  // Err - zero dimension
/// ```
pub fn validate_difficulty(tag: &str) -> Result<(), ValidationError> {
    let Some((columns, rows)) = tag.split_once('x') else {
        let mut err = ValidationError::new("difficulty_format");
        err.message = Some(format!("Difficulty must look like `3x2` (got `{tag}`)").into());
        return Err(err);
    };

    let dimensions = (columns.parse::<u32>(), rows.parse::<u32>());
    match dimensions {
        (Ok(columns), Ok(rows)) if columns > 0 && rows > 0 => Ok(()),
        _ => {
            let mut err = ValidationError::new("difficulty_dimensions");
            err.message =
                Some(format!("Difficulty dimensions must be positive integers (got `{tag}`)").into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_difficulty_valid() {
        assert!(validate_difficulty("3x2").is_ok());
        assert!(validate_difficulty("3x3").is_ok());
        assert!(validate_difficulty("5x4").is_ok());
        assert!(validate_difficulty("10x10").is_ok());
    }

    #[test]
    fn test_validate_difficulty_invalid_shape() {
        assert!(validate_difficulty("").is_err());
        assert!(validate_difficulty("3").is_err());
        assert!(validate_difficulty("3-2").is_err());
        assert!(validate_difficulty("easy").is_err());
    }

    #[test]
    fn test_validate_difficulty_invalid_dimensions() {
        assert!(validate_difficulty("0x2").is_err());
        assert!(validate_difficulty("3x0").is_err());
        assert!(validate_difficulty("3x-2").is_err());
        assert!(validate_difficulty("x4").is_err());
    }
}

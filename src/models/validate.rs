use crate::errors::AppError;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

// bounds of a NUMERIC(10, 2) column that must stay above zero
pub const MIN_PRICE: f64 = 0.01;
pub const MAX_PRICE: f64 = 99_999_999.99;

pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    max_length(field, value, max_chars)
}

pub fn max_length(field: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} too long (max {max_chars} characters)"
        )));
    }
    Ok(())
}

/// Checks the bounds and narrows to the stored width.
pub fn rating(value: i64) -> Result<i16, AppError> {
    match i16::try_from(value) {
        Ok(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Ok(rating),
        _ => Err(AppError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {value}"
        ))),
    }
}

pub fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Prices are stored in cents, so the bounds apply to the rounded value.
pub fn positive_price(price: f64) -> Result<(), AppError> {
    let rounded = round_to_cents(price);
    if !rounded.is_finite() || !(MIN_PRICE..=MAX_PRICE).contains(&rounded) {
        return Err(AppError::Validation(format!(
            "Price must be between {MIN_PRICE} and {MAX_PRICE}, got {price}"
        )));
    }
    Ok(())
}

pub fn username(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if value.trim().is_empty() || !(3..=50).contains(&len) {
        return Err(AppError::Validation(
            "Username must be between 3 and 50 characters long".into(),
        ));
    }
    Ok(())
}

// Shape check only: one '@', non-empty local part, dotted domain.
pub fn email(value: &str) -> Result<(), AppError> {
    max_length("Email", value, 255)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
                && domain
                    .split('.')
                    .filter(|part| !part.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!("Invalid email address: {value}")));
    }
    Ok(())
}

//! Validation utilities for the LPG Safety Inspection Platform
//!
//! Includes India-specific validations for compliance with local formats.

use rust_decimal::Decimal;

// ============================================================================
// Pricing & Stock Validations
// ============================================================================

/// Validate that a catalog price pair respects the discount floor
pub fn validate_price_pair(min_price: Decimal, selling_price: Decimal) -> Result<(), &'static str> {
    if selling_price <= Decimal::ZERO || min_price <= Decimal::ZERO {
        return Err("Prices must be positive");
    }
    if min_price > selling_price {
        return Err("Minimum price cannot exceed the selling price");
    }
    Ok(())
}

/// Validate a stock quantity entered by an admin
pub fn validate_stock_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Stock quantity cannot be negative");
    }
    Ok(())
}

/// Validate a line-item unit price entered by a field agent
pub fn validate_unit_price(unit_price: Decimal) -> Result<(), &'static str> {
    if unit_price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a person or agency name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 120 {
        return Err("Name must be at most 120 characters");
    }
    Ok(())
}

/// Validate an already-uploaded photo URL reference
pub fn validate_photo_url(url: &str) -> Result<(), &'static str> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err("Photo URL must be an http(s) reference")
    }
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate an Indian mobile number
/// Accepts: 9812345678, 98123-45678, +919812345678, 09812345678
pub fn validate_indian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic mobile: 10 digits starting 6-9
    if digits.len() == 10 && digits.starts_with(&['6', '7', '8', '9'][..]) {
        return Ok(());
    }
    // With trunk prefix: 11 digits starting with 0
    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 12 digits starting with 91
    if digits.len() == 12 && digits.starts_with("91") {
        return Ok(());
    }

    Err("Invalid Indian phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn price_pair_accepts_equal_floor() {
        assert!(validate_price_pair(dec("850"), dec("850")).is_ok());
    }

    #[test]
    fn price_pair_rejects_inverted_floor() {
        assert!(validate_price_pair(dec("900"), dec("850")).is_err());
    }

    #[test]
    fn price_pair_rejects_zero() {
        assert!(validate_price_pair(dec("0"), dec("850")).is_err());
        assert!(validate_price_pair(dec("100"), dec("0")).is_err());
    }

    #[test]
    fn indian_phone_formats() {
        assert!(validate_indian_phone("9812345678").is_ok());
        assert!(validate_indian_phone("+91 98123 45678").is_ok());
        assert!(validate_indian_phone("09812345678").is_ok());
        assert!(validate_indian_phone("1234567890").is_err());
        assert!(validate_indian_phone("98123").is_err());
    }

    #[test]
    fn unit_price_allows_zero_for_free_items() {
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(dec("-1")).is_err());
    }
}

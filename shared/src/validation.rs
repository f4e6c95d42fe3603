//! Validation utilities for the Fabric Ops platform
//!
//! Includes Korea-specific validations for partner master data.

// ============================================================================
// Order Validations
// ============================================================================

/// Validate a base order number: YYMM### (7 digits, valid month)
pub fn validate_order_no(order_no: &str) -> Result<(), &'static str> {
    if order_no.len() != 7 {
        return Err("Order number must be 7 digits (YYMM###)");
    }
    if !order_no.chars().all(|c| c.is_ascii_digit()) {
        return Err("Order number must contain digits only");
    }
    let month: u32 = order_no[2..4].parse().map_err(|_| "Invalid month")?;
    if !(1..=12).contains(&month) {
        return Err("Order number month must be between 01 and 12");
    }
    Ok(())
}

/// Validate a quantity entered for an order or a roll
pub fn validate_positive_qty(qty: i32) -> Result<(), &'static str> {
    if qty <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a split quantity against the available stock
pub fn validate_split_qty(qty: i32, available: i32) -> Result<(), &'static str> {
    validate_positive_qty(qty)?;
    if qty > available {
        return Err("Quantity exceeds available stock");
    }
    Ok(())
}

// ============================================================================
// Korea-Specific Validations
// ============================================================================

/// Validate a Korean business registration number (사업자등록번호)
///
/// 10-digit number with a mod-10 checksum; dashes are accepted
/// (e.g. 123-45-67890).
pub fn validate_business_registration_no(brn: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = brn.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 10 {
        return Err("Business registration number must be 10 digits");
    }

    const WEIGHTS: [u32; 9] = [1, 3, 7, 1, 3, 7, 1, 3, 5];
    let mut sum: u32 = digits
        .iter()
        .take(9)
        .zip(WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();
    sum += digits[8] * 5 / 10;

    let check_digit = (10 - (sum % 10)) % 10;
    if check_digit != digits[9] {
        return Err("Invalid business registration number checksum");
    }

    Ok(())
}

/// Validate a Korean phone number format
///
/// Accepts: 01012345678, 010-1234-5678, 0212345678, +821012345678
pub fn validate_korean_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic format: 9-11 digits starting with 0
    if (9..=11).contains(&digits.len()) && digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code 82
    if (11..=12).contains(&digits.len()) && digits.starts_with("82") {
        return Ok(());
    }

    Err("Invalid Korean phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Order Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_order_no_valid() {
        assert!(validate_order_no("2405001").is_ok());
        assert!(validate_order_no("2512999").is_ok());
        assert!(validate_order_no("2401000").is_ok());
    }

    #[test]
    fn test_validate_order_no_invalid() {
        assert!(validate_order_no("240501").is_err()); // Too short
        assert!(validate_order_no("24050011").is_err()); // Too long
        assert!(validate_order_no("24A5001").is_err()); // Non-digit
        assert!(validate_order_no("2413001").is_err()); // Month 13
        assert!(validate_order_no("2400001").is_err()); // Month 00
    }

    #[test]
    fn test_validate_positive_qty() {
        assert!(validate_positive_qty(1).is_ok());
        assert!(validate_positive_qty(500).is_ok());
        assert!(validate_positive_qty(0).is_err());
        assert!(validate_positive_qty(-5).is_err());
    }

    #[test]
    fn test_validate_split_qty() {
        assert!(validate_split_qty(30, 80).is_ok());
        assert!(validate_split_qty(80, 80).is_ok());
        assert!(validate_split_qty(81, 80).is_err());
        assert!(validate_split_qty(0, 80).is_err());
    }

    // ========================================================================
    // Korea-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_business_registration_no_valid() {
        // Checksum: 1*1+2*3+3*7+4*1+5*3+6*7+7*1+8*3+9*5 = 165, + 9*5/10 = 169
        // check = (10 - 9) % 10 = 1
        assert!(validate_business_registration_no("1234567891").is_ok());
        assert!(validate_business_registration_no("123-45-67891").is_ok());
    }

    #[test]
    fn test_validate_business_registration_no_invalid() {
        assert!(validate_business_registration_no("123456789").is_err()); // Too short
        assert!(validate_business_registration_no("1234567890").is_err()); // Bad checksum
        assert!(validate_business_registration_no("abcdefghij").is_err());
    }

    #[test]
    fn test_validate_korean_phone_valid() {
        assert!(validate_korean_phone("01012345678").is_ok());
        assert!(validate_korean_phone("010-1234-5678").is_ok());
        assert!(validate_korean_phone("0212345678").is_ok());
        assert!(validate_korean_phone("+821012345678").is_ok());
        assert!(validate_korean_phone("821012345678").is_ok());
    }

    #[test]
    fn test_validate_korean_phone_invalid() {
        assert!(validate_korean_phone("12345").is_err());
        assert!(validate_korean_phone("9876543210").is_err());
        assert!(validate_korean_phone("abcdefghijk").is_err());
    }
}

//! # Validation Module
//!
//! Business-rule validation of the back office forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms (TypeScript)                                 │
//! │  ├── Masks (CPF, phone, CEP)                                           │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (lengths, digit counts)                               │
//! │  └── Normalization (digits only)                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: brecho-store                                                 │
//! │  └── Uniqueness, referential checks                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brecho_core::validation::{normalize_cpf, validate_cep};
//!
//! assert_eq!(normalize_cpf("111.222.333-44").unwrap(), "11122233344");
//! assert!(validate_cep("01000000").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Address, Customer, Supplier};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MIN_NAME_LEN: usize = 3;
const MIN_PHONE_DIGITS: usize = 10;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_QUERY_LEN: usize = 100;

/// Keeps only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a person's name (supplier or customer).
///
/// ## Rules
/// - At least 3 characters after trimming
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a CPF and returns it as digits only.
///
/// ## Rules
/// - Punctuation is stripped ("111.222.333-44" is accepted)
/// - Exactly 11 digits remain
///
/// Check digits are not verified; the shop registers people in person.
pub fn normalize_cpf(cpf: &str) -> ValidationResult<String> {
    let digits = digits_only(cpf);

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "cpf".to_string(),
        });
    }

    if digits.len() != 11 {
        return Err(ValidationError::InvalidFormat {
            field: "cpf".to_string(),
            reason: "must have 11 digits".to_string(),
        });
    }

    Ok(digits)
}

/// Validates a phone number (landline or mobile, with area code).
///
/// ## Rules
/// - At least 10 digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if digits_only(phone).len() < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!("must have at least {MIN_PHONE_DIGITS} digits"),
        });
    }

    Ok(())
}

/// Validates an e-mail address.
///
/// ## Rules
/// - One `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid e-mail address".to_string(),
    };

    let (local, domain) = email.trim().split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || domain.contains(char::is_whitespace) {
        return Err(invalid());
    }

    match domain.find('.') {
        Some(dot) if dot > 0 && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a CEP (postal code).
///
/// ## Rules
/// - Exactly 8 digits after stripping the hyphen
pub fn validate_cep(cep: &str) -> ValidationResult<()> {
    if digits_only(cep).len() != 8 {
        return Err(ValidationError::InvalidFormat {
            field: "cep".to_string(),
            reason: "must have 8 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a full address.
///
/// ## Rules
/// - Street, number, district and city are required
/// - State is a 2-letter UF code
/// - CEP has 8 digits
pub fn validate_address(address: &Address) -> ValidationResult<()> {
    for (field, value) in [
        ("street", &address.street),
        ("number", &address.number),
        ("district", &address.district),
        ("city", &address.city),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
    }

    let state = address.state.trim();
    if state.chars().count() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::WrongLength {
            field: "state".to_string(),
            len: 2,
        });
    }

    validate_cep(&address.cep)
}

/// Validates a portal password, when one is being set.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::OutOfRange {
            field: "query".to_string(),
            min: 0,
            max: MAX_QUERY_LEN as i64,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price or cost.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (donations)
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates a supplier record before it is stored.
pub fn validate_supplier(supplier: &Supplier) -> ValidationResult<()> {
    validate_name(&supplier.name)?;
    normalize_cpf(&supplier.cpf)?;
    validate_phone(&supplier.phone)?;
    if let Some(email) = &supplier.email {
        validate_email(email)?;
    }
    validate_address(&supplier.address)
}

/// Validates a customer record. CPF and address are optional.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_name(&customer.name)?;
    if let Some(cpf) = &customer.cpf {
        normalize_cpf(cpf)?;
    }
    validate_phone(&customer.phone)?;
    if let Some(email) = &customer.email {
        validate_email(email)?;
    }
    if let Some(address) = &customer.address {
        validate_address(address)?;
    }
    Ok(())
}

/// Validates the fields of a new consigned item.
pub fn validate_consigned_item(supplier_id: &str, sale_price: Money) -> ValidationResult<()> {
    if supplier_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "supplier_id".to_string(),
        });
    }

    validate_amount("sale_price", sale_price)
}

/// Validates the fields of a new garimpo item.
pub fn validate_garimpo_item(
    purchase_place: &str,
    purchase_cost: Money,
    extra_costs: Money,
) -> ValidationResult<()> {
    if purchase_place.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "purchase_place".to_string(),
        });
    }

    validate_amount("purchase_cost", purchase_cost)?;
    validate_amount("extra_costs", extra_costs)
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Display Formatting
//!
//! Masks for Brazilian documents as printed on receipts and statements.
//! Input may contain any punctuation; only digits are kept.

use crate::validation::digits_only;

/// Formats a CPF as `000.000.000-00`.
///
/// Partial input is formatted as far as it goes.
///
/// ## Example
/// ```rust
/// use brecho_core::format::format_cpf;
///
/// assert_eq!(format_cpf("11122233344"), "111.222.333-44");
/// assert_eq!(format_cpf("1112"), "111.2");
/// ```
pub fn format_cpf(value: &str) -> String {
    let digits = digits_only(value);
    let mut out = String::with_capacity(14);

    for (i, c) in digits.chars().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }

    out
}

/// Formats a phone number.
///
/// ## Formats
/// - 11 digits (mobile): `(11) 98765-4321`
/// - 6-10 digits (landline): `(11) 3456-7890`
/// - 3-5 digits: `(11) 345`
/// - fewer: `(1`
pub fn format_phone(value: &str) -> String {
    let digits = digits_only(value);
    let len = digits.len();

    if len > 10 {
        let d = &digits[..11];
        format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..])
    } else if len > 5 {
        format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..])
    } else if len > 2 {
        format!("({}) {}", &digits[..2], &digits[2..])
    } else {
        format!("({digits}")
    }
}

/// Formats a CEP as `00000-000`. Anything other than 8 digits is returned
/// as digits only.
pub fn format_cep(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() == 8 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

/// Label code for a supplier's next consigned item: name initials plus a
/// three-digit sequence, e.g. "Maria da Silva", 1 → `MDS001`.
///
/// At most three initials are used; a blank name falls back to `CON`.
pub fn supplier_item_code(supplier_name: &str, sequence: u32) -> String {
    let initials: String = supplier_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(3)
        .collect();

    let prefix = if initials.is_empty() { "CON".to_string() } else { initials };
    format!("{prefix}{sequence:03}")
}

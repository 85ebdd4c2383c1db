//! Input validation helpers
//!
//! 文本长度上限集中放在这里，handler 在写库前统一校验。
//! 存储层不限制 TEXT 长度，上限取自表单 UX 的合理值。

use crate::utils::AppError;

/// Entity names: product, category, supplier, table, member, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (order note, movement note, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, order number, unit label, reference numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

fn too_long(field: &str, len: usize, max_len: usize) -> AppError {
    AppError::validation(format!("{field} is too long ({len} chars, max {max_len})"))
}

/// 必填文本：非空白且不超长
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(too_long(field, value.len(), max_len));
    }
    Ok(())
}

/// 可选文本：存在时不超长，缺省直接通过
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) if v.len() > max_len => Err(too_long(field, v.len(), max_len)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("Latte", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_absent_values() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "note", MAX_NOTE_LEN).is_err());
    }
}

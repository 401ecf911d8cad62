// src/utils/validation/common.rs

//! 共通バリデーション定数と関数
//!
//! DTO 間で共有するバリデーションルールをまとめる。

use validator::ValidationError;

// =============================================================================
// バリデーション定数
// =============================================================================

/// 組織の制約
pub mod organization {
    pub const NAME_MIN_LENGTH: u64 = 1;
    pub const NAME_MAX_LENGTH: u64 = 300;
    pub const PHONE_MIN_LENGTH: usize = 1;
    pub const PHONE_MAX_LENGTH: usize = 50;
}

/// 建物の制約
pub mod building {
    pub const ADDRESS_MIN_LENGTH: u64 = 1;
    pub const ADDRESS_MAX_LENGTH: u64 = 500;
}

/// 活動の制約
pub mod activity {
    pub const NAME_MIN_LENGTH: u64 = 1;
    pub const NAME_MAX_LENGTH: u64 = 200;
}

// =============================================================================
// カスタムバリデーション関数
// =============================================================================

/// 空白だけの文字列を拒否
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// 電話番号はそれぞれ 1..=50 文字
pub fn validate_phone_numbers(phone_numbers: &[String]) -> Result<(), ValidationError> {
    let invalid = phone_numbers.iter().any(|phone| {
        let length = phone.trim().chars().count();
        !(organization::PHONE_MIN_LENGTH..=organization::PHONE_MAX_LENGTH).contains(&length)
    });

    if invalid {
        let mut error = ValidationError::new("phone_number_length");
        error.message = Some("Each phone number must be between 1 and 50 characters".into());
        return Err(error);
    }
    Ok(())
}

// src/utils/error_helper.rs

//! エラーハンドリングの統一化ヘルパー
//!
//! リポジトリ層で発生したストレージエラーをドメインのエラー種別に分類します。

use crate::error::AppError;
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};
use validator::ValidationErrors;

// =============================================================================
// ストレージエラーの分類
// =============================================================================

/// 書き込み時の DbErr を分類する
///
/// * 一意制約違反 → `AlreadyExists`
/// * 外部キー制約違反 → `ValidationError`
/// * それ以外はインフラ障害としてそのまま `DbErr`
pub fn classify_write_error(err: DbErr, context: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(context = %context, detail = %detail, "Unique constraint violated");
            AppError::AlreadyExists(format!("{} already exists", context))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            warn!(context = %context, detail = %detail, "Foreign key constraint violated");
            AppError::ValidationError(format!("{} references a row that does not exist", context))
        }
        _ => {
            error!(context = %context, error = %err, "Storage write failed");
            AppError::DbErr(err)
        }
    }
}

// =============================================================================
// ログ付きエラー生成
// =============================================================================

/// リソース未発見エラーをログ付きで生成
pub fn not_found_error(resource: &str, identifier: impl std::fmt::Display) -> AppError {
    warn!(
        resource = %resource,
        identifier = %identifier,
        "Resource not found"
    );
    AppError::NotFound(format!("{} with id {} not found", resource, identifier))
}

/// validatorのValidationErrorsをAppErrorに変換する（フィールド名付き）
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    warn!(
        context = %context,
        error_count = validation_errors.field_errors().len(),
        "Validation failed"
    );
    AppError::ValidationFailure(validation_errors)
}

//! Error handling for the pricing server
//!
//! Provides consistent error responses in English and Persian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::PricingError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_fa: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Stored rules or plans that cannot be used for pricing
    #[error("Pricing data error: {0}")]
    PricingData(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match (&err, err.field()) {
            (PricingError::InvalidRate { .. }, _) | (_, None) => {
                AppError::PricingData(err.to_string())
            }
            (_, Some(field)) => AppError::Validation {
                field: field.to_string(),
                message: err.to_string(),
                message_fa: pricing_message_fa(&err),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// Persian text for cart validation failures
fn pricing_message_fa(err: &PricingError) -> String {
    match err {
        PricingError::MissingProductCode { line } => {
            format!("کد کالا در ردیف {} وارد نشده است", line + 1)
        }
        PricingError::MissingPrice { code } => {
            format!("قیمت مصرف‌کننده برای کالای {} مشخص نیست", code)
        }
        PricingError::InvalidQuantity { code, .. } => {
            format!("تعداد کالای {} باید بیشتر از صفر باشد", code)
        }
        PricingError::NegativePrice { code } => {
            format!("قیمت کالای {} نمی‌تواند منفی باشد", code)
        }
        PricingError::LineAmountOverflow { code } => {
            format!("مبلغ کالای {} بیش از حد مجاز است", code)
        }
        PricingError::CartTotalOverflow => "مبلغ کل سبد بیش از حد مجاز است".to_string(),
        PricingError::InvalidRate { .. } | PricingError::Repository(_) => {
            "خطا در اطلاعات قیمت‌گذاری".to_string()
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_fa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_fa,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_fa: message_fa.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_fa: format!("اطلاعات ورودی نامعتبر است: {}", msg),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_fa: format!("{} یافت نشد", resource),
                    field: None,
                },
            ),
            AppError::PricingData(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "PRICING_ERROR".to_string(),
                    message_en: "Price calculation failed".to_string(),
                    message_fa: "محاسبه قیمت با خطا مواجه شد".to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_fa: "خطایی در پایگاه داده رخ داد".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

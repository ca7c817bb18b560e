// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // Erro de validação dos payloads (derive do `validator`)
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    // Erro de validação do núcleo de cálculo (cobranças, itens, categorias).
    // Sempre detectado antes de qualquer cálculo.
    #[error("Valor inválido para '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Cobrança não encontrada")]
    ChargeNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Já existe uma categoria com o nome '{0}'")]
    CategoryNameAlreadyExists(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        AppError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ChargeNotFound | AppError::CategoryNotFound => StatusCode::NOT_FOUND,
            AppError::CategoryNameAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::InvalidField { .. } => "error.invalid_field",
            AppError::InvalidToken => "error.invalid_token",
            AppError::Forbidden => "error.forbidden",
            AppError::ChargeNotFound => "error.charge_not_found",
            AppError::CategoryNotFound => "error.category_not_found",
            AppError::CategoryNameAlreadyExists(_) => "error.category_name_exists",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "error.internal",
        }
    }

    /// Converte o erro de domínio na resposta HTTP, já traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();
        let error = store.translate(&locale.0, self.message_key());

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                collect_validation_messages(errors, "", &locale.0, store, &mut details);
                Some(Value::Object(details))
            }
            AppError::InvalidField { field, reason } => {
                let mut details = serde_json::Map::new();
                details.insert(field.clone(), json!([reason]));
                Some(Value::Object(details))
            }
            AppError::CategoryNameAlreadyExists(name) => Some(json!({ "name": [name] })),
            // Erros internos: o detalhe vai só para o log, nunca para o cliente.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {:?}", self);
                None
            }
            _ => None,
        };

        ApiError {
            status,
            error,
            details,
        }
    }
}

// Achata erros aninhados (`items[0].quantity`) e traduz cada mensagem.
fn collect_validation_messages(
    errors: &ValidationErrors,
    prefix: &str,
    lang: &str,
    store: &I18nStore,
    out: &mut serde_json::Map<String, Value>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => store.translate(lang, m),
                        None => e.code.to_string(),
                    })
                    .collect();
                out.insert(path, json!(messages));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_messages(inner, &path, lang, store, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_validation_messages(inner, &item_path, lang, store, out);
                }
            }
        }
    }
}

// O erro "pronto para o cliente": status + mensagem traduzida + detalhes por campo.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Fallback para quando não temos o Locale em mãos (middlewares).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared())
            .into_response()
    }
}

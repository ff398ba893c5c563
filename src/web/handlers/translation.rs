//! `translate-code` 接口处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::translation::{constants, LanguageOutcome, TranslationError, TranslationRequest};
use crate::web::types::{
    AppState, ErrorResponse, LanguageTranslation, MultiTranslateResponse, TranslateCodeRequest,
    TranslateCodeResponse, MISSING_FIELDS_MESSAGE,
};

/// 翻译代码中用户可见的文本
///
/// 单个目标语言：成功 200，失败 500（输入错误 400）。
/// 多个目标语言：总是 200，每个语言各自报告成功或失败，顺序与请求一致。
pub async fn translate_code(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateCodeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("无法解析请求体: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    if !request.has_required_fields() {
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
    }

    let (Some(code), Some(source_lang), Some(target_lang)) =
        (request.code, request.source_lang, request.target_lang)
    else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
    };

    let multiple = target_lang.is_multiple();
    tracing::info!(
        "收到翻译请求: {} → {:?}",
        source_lang,
        target_lang.as_slice()
    );

    let translation_request = TranslationRequest::new(code, source_lang, target_lang);
    let outcomes = match state.service.translate_document(&translation_request).await {
        Ok(outcomes) => outcomes,
        Err(e) => return error_response(status_for(&e), e.to_string()),
    };

    if multiple {
        let translations = outcomes.into_iter().map(to_language_translation).collect();
        return (StatusCode::OK, Json(MultiTranslateResponse { translations })).into_response();
    }

    match outcomes.into_iter().next().map(|outcome| outcome.result) {
        Some(Ok(document)) => (
            StatusCode::OK,
            Json(TranslateCodeResponse {
                translated_code: document.markup,
                provider: document.provider,
                success: true,
            }),
        )
            .into_response(),
        Some(Err(e)) => error_response(status_for(&e), e.to_string()),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "no outcome produced for target language",
        ),
    }
}

fn to_language_translation(outcome: LanguageOutcome) -> LanguageTranslation {
    match outcome.result {
        Ok(document) => LanguageTranslation {
            language: outcome.language,
            translated_code: document.markup,
            provider: document.provider,
            success: true,
            error: None,
        },
        Err(e) => LanguageTranslation {
            language: outcome.language,
            translated_code: String::new(),
            provider: constants::NO_PROVIDER.to_string(),
            success: false,
            error: Some(e.to_string()),
        },
    }
}

fn status_for(error: &TranslationError) -> StatusCode {
    match error {
        TranslationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

use std::borrow::Cow;

use pharmadocs_core::ask::AskError;
use pharmadocs_core::control::ControlError;
use pharmadocs_core::store::StoreError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn invalid_params(message: impl Into<Cow<'static, str>>) -> ErrorData {
    mcp_err(ErrorCode::INVALID_PARAMS, message)
}

pub fn map_err(err: ControlError) -> ErrorData {
    let code = match &err {
        ControlError::NotFound(_) | ControlError::Store(StoreError::NotFound(_)) => {
            ErrorCode::RESOURCE_NOT_FOUND
        }
        ControlError::Store(StoreError::InvalidInput(_))
        | ControlError::Ask(AskError::EmptyQuestion) => ErrorCode::INVALID_PARAMS,
        ControlError::Ask(_) | ControlError::Seed(_) => ErrorCode::INTERNAL_ERROR,
    };
    mcp_err(code, err.to_string())
}

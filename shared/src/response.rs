//! API Response envelope
//!
//! 错误响应和确认类响应统一走 [`ApiResponse`] 信封，资源数据响应
//! 直接返回裸 JSON，不套信封。

use serde::{Deserialize, Serialize};

/// Response code reserved for success
pub const API_CODE_SUCCESS: &str = "E0000";

/// Unified response envelope
///
/// ```json
/// {
///     "code": "E0000",
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
///
/// `data` 和 `trace_id` 为空时整个字段不出现在 JSON 里。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// E0000 为成功，其余见服务端错误码表
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 调试用请求追踪 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    fn assemble(code: impl Into<String>, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data,
            trace_id: None,
        }
    }

    /// Successful response with the default message
    pub fn ok(data: T) -> Self {
        Self::assemble(API_CODE_SUCCESS, "Success", Some(data))
    }

    /// Successful response with a custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self::assemble(API_CODE_SUCCESS, message, Some(data))
    }

    /// Error response, never carries data
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::assemble(code, message, None)
    }

    /// Attach a trace ID for debugging
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_omits_empty_fields() {
        let body = serde_json::to_value(ApiResponse::<()>::error("E0003", "Order not found"))
            .expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"code": "E0003", "message": "Order not found"})
        );
    }

    #[test]
    fn ok_envelope_carries_data_and_success_code() {
        let body =
            serde_json::to_value(ApiResponse::ok_with_message(true, "Logged out")).expect("serialize");
        assert_eq!(body["code"], API_CODE_SUCCESS);
        assert_eq!(body["message"], "Logged out");
        assert_eq!(body["data"], true);
    }

    #[test]
    fn trace_id_appears_only_when_set() {
        let body = serde_json::to_value(ApiResponse::ok(1).with_trace_id("req-42")).expect("serialize");
        assert_eq!(body["trace_id"], "req-42");
    }
}

//! Classification of management API responses.
//!
//! The service answers create-or-update requests with a handful of success
//! statuses depending on whether the resource was created, replaced or
//! accepted for asynchronous processing. Everything else is a rejection.

use reqwest::StatusCode;
use serde_json::Value;

use crate::errors::ManagementError;
use crate::types::DeleteOutcome;

/// Statuses treated as success for create-or-update requests.
pub const SUCCESS_STATUSES: [StatusCode; 6] = [
    StatusCode::CONTINUE,
    StatusCode::OK,
    StatusCode::CREATED,
    StatusCode::ACCEPTED,
    StatusCode::NO_CONTENT,
    StatusCode::MULTI_STATUS,
];

/// Whether `status` counts as a successful submission.
pub fn is_success_status(status: StatusCode) -> bool {
    SUCCESS_STATUSES.contains(&status)
}

/// Extract the error message reported by the service.
///
/// Prefers `error.message` from the JSON error envelope, then the raw body,
/// then the canonical reason phrase.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

/// Map a create-or-update response onto `Ok(())` or `ApiRejected`.
pub fn ensure_success(status: StatusCode, body: &str) -> Result<(), ManagementError> {
    if is_success_status(status) {
        Ok(())
    } else {
        Err(ManagementError::api_rejected(
            status.as_u16(),
            error_message(status, body),
        ))
    }
}

/// Map a delete response onto a `DeleteOutcome`.
///
/// `404` means the resource was already absent; any other non-2xx status is a
/// genuine rejection.
pub fn classify_delete(status: StatusCode, body: &str) -> Result<DeleteOutcome, ManagementError> {
    if status.is_success() {
        Ok(DeleteOutcome::Deleted)
    } else if status == StatusCode::NOT_FOUND {
        Ok(DeleteOutcome::NotFound)
    } else {
        Err(ManagementError::api_rejected(
            status.as_u16(),
            error_message(status, body),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Body returned by the service when deleting an index that does not exist.
    const NOT_FOUND_BODY: &str = r#"{"error":{"code":"","message":"No index with the name 'missing' was found in the service 'my-search'."}}"#;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn test_success_statuses() {
        for code in [100, 200, 201, 202, 204, 207] {
            assert!(ensure_success(status(code), "").is_ok(), "{} should succeed", code);
        }
    }

    #[test]
    fn test_rejected_statuses_carry_message() {
        for code in [400, 403, 404, 409, 500, 503] {
            let body = r#"{"error":{"code":"","message":"The request is invalid."}}"#;
            let err = ensure_success(status(code), body).unwrap_err();

            match err {
                ManagementError::ApiRejected {
                    status: rejected,
                    message,
                } => {
                    assert_eq!(rejected, code);
                    assert_eq!(message, "The request is invalid.");
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_redirect_and_reset_content_are_rejected() {
        assert!(ensure_success(status(301), "").is_err());
        assert!(ensure_success(status(205), "").is_err());
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(status(500), "plain text failure\n"),
            "plain text failure"
        );
        assert_eq!(error_message(status(502), ""), "Bad Gateway");
        assert_eq!(
            error_message(status(400), r#"{"message":"top level"}"#),
            "top level"
        );
        assert_eq!(
            error_message(status(400), r#"{"unexpected":true}"#),
            r#"{"unexpected":true}"#
        );
    }

    #[test]
    fn test_classify_delete() {
        assert_eq!(
            classify_delete(status(204), "").unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            classify_delete(status(200), "").unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            classify_delete(status(404), NOT_FOUND_BODY).unwrap(),
            DeleteOutcome::NotFound
        );

        let err = classify_delete(status(403), r#"{"error":{"message":"Forbidden"}}"#).unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("Forbidden"));
    }
}

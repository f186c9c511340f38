use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use kernel::{KernelError, Violation};
use serde::Serialize;
use std::process::{ExitCode, Termination};

use crate::format::JSON_LD;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViolationBody<'a> {
    property_path: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct ViolationListBody<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    title: &'static str,
    detail: String,
    violations: Vec<ViolationBody<'a>>,
}

#[derive(Debug, Serialize)]
struct ProblemBody {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    title: &'static str,
    detail: String,
}

/// Error bodies are JSON-LD documents whatever format the request negotiated.
fn linked(status: StatusCode, body: impl Serialize) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, header::HeaderValue::from_static(JSON_LD))],
        Json(body),
    )
        .into_response()
}

fn problem(status: StatusCode, detail: String) -> Response {
    let body = ProblemBody {
        context: "/contexts/Error",
        kind: "hydra:Error",
        title: "An error occurred",
        detail,
    };
    linked(status, body)
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let report = self.0;
        let status = match report.current_context() {
            KernelError::Validation => {
                let violations = Violation::collect(&report);
                let detail = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                let body = ViolationListBody {
                    context: "/contexts/ConstraintViolationList",
                    kind: "ConstraintViolationList",
                    title: "An error occurred",
                    detail,
                    violations: violations
                        .into_iter()
                        .map(|violation| ViolationBody {
                            property_path: violation.property_path(),
                            message: violation.message(),
                        })
                        .collect(),
                };
                tracing::debug!("{report:?}");
                return linked(StatusCode::UNPROCESSABLE_ENTITY, body);
            }
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::InvalidRequest => StatusCode::BAD_REQUEST,
            KernelError::Concurrency => StatusCode::CONFLICT,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => {
                tracing::error!("{report:?}");
                return problem(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    KernelError::Internal.to_string(),
                );
            }
        };
        tracing::debug!("{report:?}");
        let detail = report
            .frames()
            .find_map(|frame| frame.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| report.current_context().to_string());
        problem(status, detail)
    }
}

/// Rejection for an `Accept` header that names no supported media type.
#[derive(Debug)]
pub struct NotAcceptable(pub String);

impl IntoResponse for NotAcceptable {
    fn into_response(self) -> Response {
        let mut response = problem(
            StatusCode::NOT_ACCEPTABLE,
            format!("Requested format \"{}\" is not supported.", self.0),
        );
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

#[cfg(test)]
mod test {
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use error_stack::Report;
    use kernel::{KernelError, ViolationReport};

    use super::{ErrorStatus, NotAcceptable};

    async fn body(report: Report<KernelError>) -> (StatusCode, serde_json::Value) {
        let response = ErrorStatus::from(report).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/ld+json"
        );
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 10_000)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_violations() {
        let report = Report::violation("body", "This value should not be blank.")
            .attach_printable(kernel::Violation::new(
                "rating",
                "This value should be between 0 and 5.",
            ));
        let (status, json) = body(report).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["@type"], "ConstraintViolationList");
        assert_eq!(json["violations"][0]["propertyPath"], "body");
        assert_eq!(json["violations"][1]["propertyPath"], "rating");
        assert_eq!(
            json["detail"],
            "body: This value should not be blank.\nrating: This value should be between 0 and 5."
        );
    }

    #[tokio::test]
    async fn kinds_map_to_status() {
        let cases = [
            (KernelError::NotFound, StatusCode::NOT_FOUND),
            (KernelError::InvalidRequest, StatusCode::BAD_REQUEST),
            (KernelError::Concurrency, StatusCode::CONFLICT),
            (KernelError::Timeout, StatusCode::REQUEST_TIMEOUT),
            (KernelError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            let (status, json) = body(Report::new(error).attach_printable("detail")).await;
            assert_eq!(status, expected);
            assert_eq!(json["@type"], "hydra:Error");
        }
    }

    #[test]
    fn not_acceptable_is_a_problem_document() {
        let response = NotAcceptable("text/html".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
    }
}

//! Request extractors whose rejections use the API error body.

use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// `axum::Json` that answers malformed or incomplete bodies with a 400
/// `{"error": ..}` instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Serialize)]
    struct Dose {
        capsules: i32,
    }

    fn app() -> Router {
        Router::new().route("/echo", post(|Json(d): Json<Dose>| async move { Json(d) }))
    }

    async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_post(body: &'static str) -> Request<Body> {
        Request::post("/echo")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_round_trips() {
        let (status, body) = send(json_post(r#"{"capsules":30}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["capsules"], 30);
    }

    #[tokio::test]
    async fn syntax_errors_are_bad_requests() {
        let (status, body) = send(json_post(r#"{"capsules":"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn wrong_types_are_bad_requests() {
        let (status, body) = send(json_post(r#"{"capsules":"thirty"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("capsules"));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_bad_request() {
        let req = Request::post("/echo")
            .body(Body::from(r#"{"capsules":30}"#))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

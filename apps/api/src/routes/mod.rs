pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::chatbot::handlers as chatbot;
use crate::departments::handlers as departments;
use crate::employees::{dashboard, handlers as employees};
use crate::import::handlers as import;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Spreadsheet import / export
        .route(
            "/api/v1/employees/import",
            post(import::handle_import).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/employees/export", get(import::handle_export))
        // Chatbot
        .route("/api/v1/chatbot/ask", post(chatbot::handle_ask))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        // Employees
        .route(
            "/api/v1/employees",
            get(employees::handle_list).post(employees::handle_create),
        )
        .route(
            "/api/v1/employees/:id",
            get(employees::handle_get)
                .put(employees::handle_update)
                .delete(employees::handle_delete),
        )
        // Departments
        .route(
            "/api/v1/departments",
            get(departments::handle_list).post(departments::handle_create),
        )
        .route(
            "/api/v1/departments/:id",
            put(departments::handle_update).delete(departments::handle_delete),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use rust_xlsxwriter::Workbook;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::store::memory::{employee_row, MemoryStore};

    const BOUNDARY: &str = "talento-test-boundary";

    fn app(store: Arc<MemoryStore>) -> Router {
        app_with_upload_limit(store, 1024 * 1024)
    }

    fn app_with_upload_limit(store: Arc<MemoryStore>, max_upload_bytes: usize) -> Router {
        let config = Config {
            database_url: "postgres://localhost/unused".to_string(),
            anthropic_api_key: None,
            llm_timeout: Duration::from_secs(1),
            max_upload_bytes,
            port: 0,
            rust_log: "info".to_string(),
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState {
            db,
            store,
            classifier: None,
            config,
        })
    }

    fn multipart(field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"staff.xlsx\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/api/v1/employees/import")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn ask(message: &str) -> Request<Body> {
        Request::post("/api/v1/chatbot/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "message": message }).to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn workbook(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "talento-api");
    }

    #[tokio::test]
    async fn test_import_success_is_200() {
        let store = Arc::new(MemoryStore::new());
        store.add_department("Ventas");
        let bytes = workbook(&[
            &["Documento", "Nombre", "Cargo", "Departamento"],
            &["77", "Lia", "Seller", "Ventas"],
        ]);

        let response = app(store.clone())
            .oneshot(multipart("file", &bytes))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["imported"], 1);
        assert_eq!(store.employees().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_import_is_422() {
        let store = Arc::new(MemoryStore::new());
        let bytes = workbook(&[&["Documento", "Nombre", "Cargo"], &["77", "Lia", "Seller"]]);

        let response = app(store).oneshot(multipart("file", &bytes)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_without_file_field_is_400() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(multipart("attachment", b"PK"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let response = app_with_upload_limit(Arc::new(MemoryStore::new()), 512)
            .oneshot(multipart("file", &[b'x'; 4096]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("File is too large"));
    }

    #[tokio::test]
    async fn test_chatbot_answers_from_store() {
        let store = Arc::new(MemoryStore::new());
        let sales = store.add_department("Ventas");
        store.add_employee(employee_row("1", "Ana", "Analista", sales));

        let response = app(store).oneshot(ask("¿Cuántos analistas hay?")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["response"].as_str().unwrap().contains("**1 analysts**"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_chatbot_rejects_blank_message() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(ask("   "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_uses_roster() {
        let store = Arc::new(MemoryStore::new());
        let sales = store.add_department("Ventas");
        store.add_employee(employee_row("1", "Ana", "Seller", sales));
        store.add_employee(employee_row("2", "Bob", "Seller", sales));

        let response = app(store)
            .oneshot(Request::get("/api/v1/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total_employees"], 2);
        assert_eq!(body["employees_by_department"][0]["department"], "Ventas");
    }
}

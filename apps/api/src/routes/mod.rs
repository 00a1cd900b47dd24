pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume::handlers as resume_handlers;
use crate::skills::handlers as skill_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Skills API
        .route(
            "/api/v1/skills/extract",
            post(skill_handlers::handle_extract_skills),
        )
        // Resume API
        .route(
            "/api/v1/resumes/sections",
            post(resume_handlers::handle_preview_sections),
        )
        .route(
            "/api/v1/resumes/enhance",
            post(resume_handlers::handle_enhance),
        )
        .route(
            "/api/v1/downloads/:id",
            get(resume_handlers::handle_download),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::build_router;
    use crate::artifacts::ArtifactStore;
    use crate::config::Config;
    use crate::models::skills::SkillMap;
    use crate::resume::parser::test_support::docx_from_lines;
    use crate::skills::extractor::{test_support::StubExtractor, SkillExtractor};
    use crate::state::AppState;

    const BOUNDARY: &str = "resume-enhancer-test-boundary";

    fn test_config() -> Config {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 1024 * 1024,
            artifact_dir: None,
            artifact_ttl_secs: 60,
        }
    }

    fn app_with(extractor: impl SkillExtractor + 'static) -> Router {
        let config = test_config();
        let state = AppState {
            extractor: Arc::new(extractor),
            artifacts: ArtifactStore::new(None, config.artifact_ttl_secs).unwrap(),
            config,
        };
        build_router(state)
    }

    fn extracted() -> SkillMap {
        let mut skills = SkillMap::new();
        skills.push("Skills", "Rust");
        skills.push("Certifications", "CKA");
        skills
    }

    enum Part<'a> {
        File(&'a str, &'a str, Vec<u8>),
        Text(&'a str, String),
    }

    fn multipart_request(uri: &str, parts: Vec<Part<'_>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn resume_docx() -> Vec<u8> {
        docx_from_lines(&["Experience:", "Did stuff", "Skills:", "Python"])
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(StubExtractor::returning(SkillMap::new()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_skills_lists_candidates() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .oneshot(json_request(
                "/api/v1/skills/extract",
                json!({"job_description": "Rust engineer, CKA preferred"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["skills"], json!({"Skills": ["Rust"], "Certifications": ["CKA"]}));
        assert_eq!(body["candidates"][0]["id"], "Skills::Rust");
        assert_eq!(body["candidates"][1]["label"], "Add to Certifications: CKA?");
        assert!(body.get("warning").is_none());
    }

    #[tokio::test]
    async fn test_extract_skills_failure_is_warning() {
        let app = app_with(StubExtractor::failing("invalid api key"));
        let response = app
            .oneshot(json_request(
                "/api/v1/skills/extract",
                json!({"job_description": "Rust engineer"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["skills"], json!({}));
        assert_eq!(body["candidates"], json!([]));
        assert_eq!(body["warning"], "Error extracting skills: invalid api key");
    }

    #[tokio::test]
    async fn test_extract_skills_requires_job_description() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .oneshot(json_request(
                "/api/v1/skills/extract",
                json!({"job_description": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_preview_sections() {
        let app = app_with(StubExtractor::returning(SkillMap::new()));
        let response = app
            .oneshot(multipart_request(
                "/api/v1/resumes/sections",
                vec![Part::File("resume", "cv.docx", resume_docx())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["format"], "docx");
        assert_eq!(
            body["sections"],
            json!([
                {"name": "Experience", "lines": ["Did stuff"]},
                {"name": "Skills", "lines": ["Python"]}
            ])
        );
    }

    #[tokio::test]
    async fn test_enhance_then_download() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .clone()
            .oneshot(multipart_request(
                "/api/v1/resumes/enhance",
                vec![
                    Part::File("resume", "cv.docx", resume_docx()),
                    Part::Text("job_description", "Seeking Python expert who knows Rust".into()),
                    Part::Text("approved", json!(["Skills::Rust"]).to_string()),
                    Part::Text("format", "text".into()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["approved"], json!({"Skills": ["Rust"]}));
        assert_eq!(body["sections"][1]["lines"], json!(["Python", "Rust"]));
        let old = body["ats_score_old"].as_f64().unwrap();
        let new = body["ats_score_new"].as_f64().unwrap();
        assert!(old > 0.0 && new > old && new <= 100.0, "old={old} new={new}");
        assert_eq!(body["download"]["filename"], "Updated_Resume.txt");

        let url = body["download"]["url"].as_str().unwrap().to_string();
        let download = app
            .oneshot(Request::get(url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(
            download.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Updated_Resume.txt\""
        );
        let bytes = to_bytes(download.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "Experience:\nDid stuff\nSkills:\nPython\nRust"
        );
    }

    #[tokio::test]
    async fn test_enhance_with_supplied_skills_and_pair_ids() {
        let app = app_with(StubExtractor::failing("not used"));
        let response = app
            .oneshot(multipart_request(
                "/api/v1/resumes/enhance",
                vec![
                    Part::File("resume", "cv.docx", resume_docx()),
                    Part::Text("job_description", "CKA certified engineer".into()),
                    Part::Text("skills", extracted_json()),
                    Part::Text(
                        "approved",
                        json!([{"section": "Certifications", "skill": "CKA"}]).to_string(),
                    ),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body.get("warning").is_none());
        assert_eq!(body["additions"][0]["section"], "Certifications");
        assert_eq!(body["additions"][0]["new_section"], true);
        assert_eq!(body["download"]["filename"], "Updated_Resume.docx");
    }

    fn extracted_json() -> String {
        serde_json::to_string(&extracted()).unwrap()
    }

    #[tokio::test]
    async fn test_enhance_rejects_unsupported_file() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .oneshot(multipart_request(
                "/api/v1/resumes/enhance",
                vec![
                    Part::File("resume", "cv.txt", b"Skills:\nRust".to_vec()),
                    Part::Text("job_description", "Rust".into()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "UNSUPPORTED_FILE_TYPE"
        );
    }

    #[tokio::test]
    async fn test_enhance_requires_job_description() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .oneshot(multipart_request(
                "/api/v1/resumes/enhance",
                vec![Part::File("resume", "cv.docx", resume_docx())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enhance_rejects_bad_approved_json() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .oneshot(multipart_request(
                "/api/v1/resumes/enhance",
                vec![
                    Part::File("resume", "cv.docx", resume_docx()),
                    Part::Text("job_description", "Rust".into()),
                    Part::Text("approved", "Skills::Rust".into()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_download_id_is_json_404() {
        let app = app_with(StubExtractor::returning(SkillMap::new()));
        let response = app
            .oneshot(
                Request::get("/api/v1/downloads/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_extract_skills_bad_json_is_json_error() {
        for body in ["{not json", r#"{"description": "Rust"}"#] {
            let app = app_with(StubExtractor::returning(extracted()));
            let request = Request::builder()
                .method("POST")
                .uri("/api/v1/skills/extract")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_enhance_without_multipart_is_json_error() {
        let app = app_with(StubExtractor::returning(extracted()));
        let response = app
            .oneshot(json_request(
                "/api/v1/resumes/enhance",
                json!({"job_description": "Rust"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INVALID_MULTIPART");
    }

    #[tokio::test]
    async fn test_unknown_download_is_404() {
        let app = app_with(StubExtractor::returning(SkillMap::new()));
        let uri = format!("/api/v1/downloads/{}", uuid::Uuid::new_v4());
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

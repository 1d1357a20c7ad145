//! Public serving of stored KYC files

use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use super::documents::storage_error_response;
use super::helpers::error_response;
use crate::models::ErrorResponse;
use crate::services::DocumentStorage;

/// Serve a stored KYC file with a guessed content type
#[utoipa::path(
    get,
    path = "/uploads/kyc/{filename}",
    tag = "Documents",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn serve_kyc_file(
    storage: web::Data<DocumentStorage>,
    path: web::Path<String>,
) -> impl Responder {
    match storage.read(&path).await {
        Ok(Some((bytes, content_type))) => HttpResponse::Ok()
            .content_type(content_type)
            .insert_header(("Cache-Control", "private, max-age=300"))
            .body(bytes),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "File not found"),
        Err(e) => storage_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test, App};

    #[actix_web::test]
    async fn test_serves_stored_file_and_rejects_bad_names() {
        let root = tempfile::tempdir().unwrap();
        let storage = DocumentStorage::new(root.path(), 1024);
        storage.ensure_dir().await.unwrap();
        tokio::fs::write(storage.dir().join("abc.png"), b"png-bytes")
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .route("/uploads/kyc/{filename}", web::get().to(serve_kyc_file)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/uploads/kyc/abc.png").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
        assert_eq!(to_bytes(resp.into_body()).await.unwrap().as_ref(), b"png-bytes");

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/uploads/kyc/missing.pdf").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/uploads/kyc/..%2Fsecret.txt").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

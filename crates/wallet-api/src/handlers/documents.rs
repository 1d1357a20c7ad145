//! KYC document handlers

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use shared::DbPool;

use super::helpers::{
    error_response, handle_db_error, handle_write_error, internal_error, invalid_status,
    validate_request,
};
use crate::middleware::{get_user_id, require_admin};
use crate::models::{
    DocumentEnvelope, DocumentListResponse, DocumentStatus, ErrorResponse, MessageResponse,
    UploadDocumentRequest,
};
use crate::repositories::documents::NewDocument;
use crate::repositories::{DocumentRepository, ReviewOutcome};
use crate::services::{DocumentStorage, StorageError};

/// Map a storage failure to a response
pub(super) fn storage_error_response(err: &StorageError) -> HttpResponse {
    match err {
        StorageError::TooLarge { .. } => {
            error_response(StatusCode::PAYLOAD_TOO_LARGE, "file_too_large", err.to_string())
        }
        StorageError::Io(e) => internal_error("access document storage", e),
        _ => error_response(StatusCode::BAD_REQUEST, "invalid_file", err.to_string()),
    }
}

/// Upload a KYC document
///
/// The file travels base64-encoded in the JSON body. It is written to disk
/// first; if the database insert then fails the file is removed again.
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document uploaded", body = DocumentEnvelope),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_document(
    pool: web::Data<DbPool>,
    storage: web::Data<DocumentStorage>,
    req_http: HttpRequest,
    req: web::Json<UploadDocumentRequest>,
) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let upload = match storage.prepare(&req.file_name, &req.content_base64) {
        Ok(upload) => upload,
        Err(e) => return storage_error_response(&e),
    };

    let stored = match storage.save(&upload).await {
        Ok(stored) => stored,
        Err(e) => return storage_error_response(&e),
    };

    let new_doc = NewDocument {
        user_id: &user_id,
        doc_type: req.doc_type,
        filename: &stored.filename,
        original_name: &upload.original_name,
        mime_type: &upload.mime_type,
        size_bytes: stored.size_bytes,
    };

    let doc = match handle_write_error(
        DocumentRepository::create(&pool, &new_doc).await,
        "save document",
        "User",
        None,
    ) {
        Ok(doc) => doc,
        Err(resp) => {
            storage.remove(&stored.filename).await;
            return resp;
        }
    };

    tracing::info!(
        user_id = %user_id,
        document_id = %doc.id,
        doc_type = req.doc_type.as_str(),
        size_bytes = stored.size_bytes,
        "KYC document uploaded"
    );

    HttpResponse::Created().json(DocumentEnvelope::new(doc))
}

/// Own documents, newest first
#[utoipa::path(
    get,
    path = "/api/documents/my",
    tag = "Documents",
    responses(
        (status = 200, description = "Own documents", body = DocumentListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_documents(pool: web::Data<DbPool>, req_http: HttpRequest) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match handle_db_error(
        DocumentRepository::list_for_user(&pool, &user_id).await,
        "list documents",
    ) {
        Ok(docs) => HttpResponse::Ok().json(DocumentListResponse::new(docs)),
        Err(resp) => resp,
    }
}

/// Delete one of your own pending documents
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document already reviewed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_document(
    pool: web::Data<DbPool>,
    storage: web::Data<DocumentStorage>,
    req_http: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let document_id = path.into_inner();

    let outcome = match handle_db_error(
        DocumentRepository::delete_pending(&pool, &document_id, &user_id).await,
        "delete document",
    ) {
        Ok(outcome) => outcome,
        Err(resp) => return resp,
    };

    match outcome {
        ReviewOutcome::Done(doc) => {
            storage.remove(&doc.filename).await;
            tracing::info!(user_id = %user_id, document_id = %doc.id, "KYC document deleted");
            HttpResponse::Ok().json(MessageResponse::new("Document deleted"))
        }
        ReviewOutcome::NotFound => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Document not found")
        }
        ReviewOutcome::NotPending(status) => invalid_status("Document", &status),
    }
}

async fn review_document(
    pool: &DbPool,
    req_http: &HttpRequest,
    document_id: &str,
    decision: DocumentStatus,
) -> HttpResponse {
    let admin = match require_admin(req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };

    let outcome = match handle_write_error(
        DocumentRepository::review(pool, document_id, &admin.sub, decision).await,
        "review document",
        "Admin account",
        None,
    ) {
        Ok(outcome) => outcome,
        Err(resp) => return resp,
    };

    match outcome {
        ReviewOutcome::Done(doc) => {
            tracing::info!(
                admin_id = %admin.sub,
                document_id = %doc.id,
                user_id = %doc.user_id,
                status = decision.as_str(),
                "KYC document reviewed"
            );
            HttpResponse::Ok().json(DocumentEnvelope::new(doc))
        }
        ReviewOutcome::NotFound => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Document not found")
        }
        ReviewOutcome::NotPending(status) => invalid_status("Document", &status),
    }
}

/// Mark a pending document as verified (admin)
#[utoipa::path(
    post,
    path = "/api/documents/verify/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document verified", body = DocumentEnvelope),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document already reviewed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_document(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    review_document(&pool, &req_http, &path, DocumentStatus::Verified).await
}

/// Mark a pending document as rejected (admin)
#[utoipa::path(
    post,
    path = "/api/documents/reject/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document rejected", body = DocumentEnvelope),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document already reviewed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_document(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    review_document(&pool, &req_http, &path, DocumentStatus::Rejected).await
}

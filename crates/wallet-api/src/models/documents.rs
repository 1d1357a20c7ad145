//! KYC document DTOs and status rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Kind of identity document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    NationalId,
    DrivingLicence,
    ProofOfAddress,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Passport => "passport",
            DocumentType::NationalId => "national_id",
            DocumentType::DrivingLicence => "driving_licence",
            DocumentType::ProofOfAddress => "proof_of_address",
            DocumentType::Other => "other",
        }
    }
}

/// Review state of a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Verified => "verified",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "verified" => Ok(DocumentStatus::Verified),
            "rejected" => Ok(DocumentStatus::Rejected),
            other => Err(format!("unknown document status '{}'", other)),
        }
    }
}

/// Account-level KYC state, derived from the user's documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    NotSubmitted,
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::NotSubmitted => "not_submitted",
            KycStatus::Pending => "pending",
            KycStatus::Verified => "verified",
            KycStatus::Rejected => "rejected",
        }
    }

    /// Derive the account status from every document the user holds
    ///
    /// Any pending document keeps the account pending; otherwise one verified
    /// document is enough.
    pub fn derive<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = DocumentStatus>,
    {
        let mut any = false;
        let mut verified = false;

        for status in statuses {
            any = true;
            match status {
                DocumentStatus::Pending => return KycStatus::Pending,
                DocumentStatus::Verified => verified = true,
                DocumentStatus::Rejected => {}
            }
        }

        match (any, verified) {
            (false, _) => KycStatus::NotSubmitted,
            (true, true) => KycStatus::Verified,
            (true, false) => KycStatus::Rejected,
        }
    }
}

/// Upload request; the file travels base64-encoded inside the JSON body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"type": "passport", "fileName": "passport.jpg", "contentBase64": "/9j/4AAQSkZJRg..."}))]
pub struct UploadDocumentRequest {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    #[validate(length(min = 1))]
    pub content_base64: String,
}

/// Document as returned to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Relative URL the stored file is served from
    pub url: String,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<shared::models::KycDocument> for DocumentResponse {
    fn from(doc: shared::models::KycDocument) -> Self {
        Self {
            url: format!("/uploads/kyc/{}", doc.filename),
            id: doc.id,
            user_id: doc.user_id,
            doc_type: doc.doc_type,
            filename: doc.filename,
            original_name: doc.original_name,
            mime_type: doc.mime_type,
            size_bytes: doc.size_bytes,
            status: doc.status,
            reviewed_by: doc.reviewed_by,
            reviewed_at: doc.reviewed_at,
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentEnvelope {
    pub success: bool,
    pub document: DocumentResponse,
}

impl DocumentEnvelope {
    pub fn new(doc: shared::models::KycDocument) -> Self {
        Self {
            success: true,
            document: doc.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub success: bool,
    pub documents: Vec<DocumentResponse>,
}

impl DocumentListResponse {
    pub fn new(docs: Vec<shared::models::KycDocument>) -> Self {
        Self {
            success: true,
            documents: docs.into_iter().map(DocumentResponse::from).collect(),
        }
    }
}

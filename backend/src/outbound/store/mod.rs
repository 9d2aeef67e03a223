//! Reqwest-backed adapter for the hosted document store.
//!
//! The adapter owns transport details only: URL construction, HTTP error
//! mapping and decoding stored documents into domain records. The store
//! exposes one REST collection per logical collection
//! (`/v1/<collection>[/<id>]`) with equality filters via the query string.

pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use self::dto::{AnnouncementDoc, DocumentRequestDoc, ResidentDoc, StaffDoc};
use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::domain::document_request::{DocumentRequest, RecordId, RequestStatus};
use crate::domain::identity::IdentityId;
use crate::domain::ports::store::StoreError;
use crate::domain::ports::{
    AnnouncementRepository, DocumentRequestRepository, NewDocumentRequest, ResidentRepository,
    StaffDirectory,
};
use crate::domain::resident::Resident;
use crate::domain::role::StaffRecord;

const RESIDENTS: &str = "residents";
const DOCUMENT_REQUESTS: &str = "document_requests";
const ANNOUNCEMENTS: &str = "announcements";
const STAFF: &str = "users";

/// Document store adapter speaking the hosted REST surface.
#[derive(Debug)]
pub struct HttpDocumentStore {
    client: Client,
    base: Url,
}

impl HttpDocumentStore {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot carry path segments or the HTTP client
    /// cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, StoreError> {
        if base.cannot_be_a_base() {
            return Err(StoreError::query(format!(
                "store url {base} cannot carry collection paths"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::connection(err.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v1").extend(segments);
        }
        url
    }

    async fn fetch_list<D: DeserializeOwned>(&self, url: Url) -> Result<Vec<D>, StoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|err| StoreError::decode(format!("invalid collection payload: {err}")))
    }

    async fn fetch_doc<D: DeserializeOwned>(&self, url: Url) -> Result<Option<D>, StoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map(Some)
            .map_err(|err| StoreError::decode(format!("invalid document payload: {err}")))
    }

    async fn write(&self, method: Method, url: Url, body: &Value) -> Result<Vec<u8>, StoreError> {
        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn remove(&self, url: Url) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        // Deleting an absent document is not an error; commits may race a
        // manual cleanup.
        if status == StatusCode::NOT_FOUND || status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
        serde_json::to_value(value)
            .map_err(|err| StoreError::query(format!("unserialisable document: {err}")))
    }
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    StoreError::connection(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StoreError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    if status.is_server_error() {
        StoreError::connection(message)
    } else {
        StoreError::query(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn decode_all<D, T, F>(docs: Vec<D>, decode: F) -> Result<Vec<T>, StoreError>
where
    F: Fn(D) -> Result<T, String>,
{
    docs.into_iter()
        .map(|doc| decode(doc).map_err(StoreError::decode))
        .collect()
}

#[async_trait]
impl ResidentRepository for HttpDocumentStore {
    async fn upsert(&self, resident: &Resident) -> Result<(), StoreError> {
        let url = self.endpoint(&[RESIDENTS, resident.id.as_ref()]);
        self.write(Method::PATCH, url, &Self::to_body(resident)?)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Resident>, StoreError> {
        let url = self.endpoint(&[RESIDENTS, id.as_ref()]);
        let doc: Option<ResidentDoc> = self.fetch_doc(url).await?;
        doc.map(|doc| doc.into_domain().map_err(StoreError::decode))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Resident>, StoreError> {
        let url = self.endpoint(&[RESIDENTS]);
        let docs: Vec<ResidentDoc> = self.fetch_list(url).await?;
        let mut residents = decode_all(docs, ResidentDoc::into_domain)?;
        residents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(residents)
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), StoreError> {
        self.remove(self.endpoint(&[RESIDENTS, id.as_ref()])).await
    }
}

#[async_trait]
impl DocumentRequestRepository for HttpDocumentStore {
    async fn create(&self, draft: &NewDocumentRequest) -> Result<DocumentRequest, StoreError> {
        let body = serde_json::json!({
            "residentId": draft.resident_id,
            "residentName": draft.resident_name,
            "documentType": draft.document_type,
            "purpose": draft.purpose,
            "status": draft.status,
            "requestDate": draft.request_date,
            "attachmentUrl": draft.attachment_url,
        });
        let stored = self
            .write(Method::POST, self.endpoint(&[DOCUMENT_REQUESTS]), &body)
            .await?;
        let doc: DocumentRequestDoc = serde_json::from_slice(&stored)
            .map_err(|err| StoreError::decode(format!("invalid created document: {err}")))?;
        doc.into_domain().map_err(StoreError::decode)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<DocumentRequest>, StoreError> {
        let url = self.endpoint(&[DOCUMENT_REQUESTS, id.as_ref()]);
        let doc: Option<DocumentRequestDoc> = self.fetch_doc(url).await?;
        doc.map(|doc| doc.into_domain().map_err(StoreError::decode))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<DocumentRequest>, StoreError> {
        let url = self.endpoint(&[DOCUMENT_REQUESTS]);
        let docs: Vec<DocumentRequestDoc> = self.fetch_list(url).await?;
        Ok(newest_first(decode_all(docs, DocumentRequestDoc::into_domain)?))
    }

    async fn list_by_resident(
        &self,
        resident_id: &IdentityId,
    ) -> Result<Vec<DocumentRequest>, StoreError> {
        let mut url = self.endpoint(&[DOCUMENT_REQUESTS]);
        url.query_pairs_mut()
            .append_pair("residentId", resident_id.as_ref());
        let docs: Vec<DocumentRequestDoc> = self.fetch_list(url).await?;
        Ok(newest_first(decode_all(docs, DocumentRequestDoc::into_domain)?))
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DocumentRequest>, StoreError> {
        let mut url = self.endpoint(&[DOCUMENT_REQUESTS]);
        let status_value = serde_json::to_value(status)
            .map_err(|err| StoreError::query(format!("unserialisable status: {err}")))?;
        if let Some(status_str) = status_value.as_str() {
            url.query_pairs_mut().append_pair("status", status_str);
        }
        let docs: Vec<DocumentRequestDoc> = self.fetch_list(url).await?;
        Ok(newest_first(decode_all(docs, DocumentRequestDoc::into_domain)?))
    }

    async fn update(&self, request: &DocumentRequest) -> Result<(), StoreError> {
        let url = self.endpoint(&[DOCUMENT_REQUESTS, request.id.as_ref()]);
        self.write(Method::PATCH, url, &Self::to_body(request)?)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.remove(self.endpoint(&[DOCUMENT_REQUESTS, id.as_ref()]))
            .await
    }
}

fn newest_first(mut requests: Vec<DocumentRequest>) -> Vec<DocumentRequest> {
    requests.sort_by(|a, b| b.request_date.cmp(&a.request_date));
    requests
}

#[async_trait]
impl AnnouncementRepository for HttpDocumentStore {
    async fn create(&self, draft: &NewAnnouncement) -> Result<Announcement, StoreError> {
        let body = serde_json::json!({
            "title": draft.title,
            "content": draft.content,
            "category": draft.category,
            "createdBy": draft.created_by,
            "isActive": draft.is_active,
            "attachmentUrl": draft.attachment_url,
        });
        let stored = self
            .write(Method::POST, self.endpoint(&[ANNOUNCEMENTS]), &body)
            .await?;
        let doc: AnnouncementDoc = serde_json::from_slice(&stored)
            .map_err(|err| StoreError::decode(format!("invalid created document: {err}")))?;
        doc.into_domain().map_err(StoreError::decode)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Announcement>, StoreError> {
        let url = self.endpoint(&[ANNOUNCEMENTS, id.as_ref()]);
        let doc: Option<AnnouncementDoc> = self.fetch_doc(url).await?;
        doc.map(|doc| doc.into_domain().map_err(StoreError::decode))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Announcement>, StoreError> {
        let url = self.endpoint(&[ANNOUNCEMENTS]);
        let docs: Vec<AnnouncementDoc> = self.fetch_list(url).await?;
        let mut announcements = decode_all(docs, AnnouncementDoc::into_domain)?;
        announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(announcements)
    }

    async fn list_active(&self) -> Result<Vec<Announcement>, StoreError> {
        let mut url = self.endpoint(&[ANNOUNCEMENTS]);
        url.query_pairs_mut().append_pair("isActive", "true");
        let docs: Vec<AnnouncementDoc> = self.fetch_list(url).await?;
        let mut announcements = decode_all(docs, AnnouncementDoc::into_domain)?;
        announcements.retain(|a| a.is_active);
        announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(announcements)
    }

    async fn update(&self, announcement: &Announcement) -> Result<(), StoreError> {
        let url = self.endpoint(&[ANNOUNCEMENTS, announcement.id.as_ref()]);
        self.write(Method::PATCH, url, &Self::to_body(announcement)?)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.remove(self.endpoint(&[ANNOUNCEMENTS, id.as_ref()]))
            .await
    }
}

#[async_trait]
impl StaffDirectory for HttpDocumentStore {
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<StaffRecord>, StoreError> {
        let url = self.endpoint(&[STAFF, id.as_ref()]);
        let doc: Option<StaffDoc> = self.fetch_doc(url).await?;
        doc.map(|doc| doc.into_domain().map_err(StoreError::decode))
            .transpose()
    }

    async fn upsert(&self, record: &StaffRecord) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "id": record.uid,
            "email": record.email,
            "name": record.name,
            "grade": record.grade,
            "createdAt": record.created_at,
            "createdBy": record.created_by,
        });
        let url = self.endpoint(&[STAFF, record.uid.as_ref()]);
        self.write(Method::PATCH, url, &body).await?;
        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), StoreError> {
        self.remove(self.endpoint(&[STAFF, id.as_ref()])).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network store helpers.
    use super::*;
    use rstest::rstest;

    fn store(base: &str) -> HttpDocumentStore {
        HttpDocumentStore::new(
            Url::parse(base).expect("fixture url"),
            Duration::from_secs(5),
        )
        .expect("adapter builds")
    }

    #[rstest]
    #[case::bare_host("https://store.example.com", "https://store.example.com/v1/residents/res-1")]
    #[case::trailing_slash(
        "https://store.example.com/",
        "https://store.example.com/v1/residents/res-1"
    )]
    #[case::nested_base(
        "https://store.example.com/tenants/brgy-1",
        "https://store.example.com/tenants/brgy-1/v1/residents/res-1"
    )]
    fn endpoints_nest_under_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let url = store(base).endpoint(&[RESIDENTS, "res-1"]);
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn a_non_hierarchical_base_is_rejected() {
        let err = HttpDocumentStore::new(
            Url::parse("mailto:ops@example.com").expect("fixture url"),
            Duration::from_secs(5),
        )
        .expect_err("mailto urls cannot hold collections");
        assert!(matches!(err, StoreError::Query { .. }));
    }

    #[rstest]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, true)]
    #[case::bad_request(StatusCode::BAD_REQUEST, false)]
    #[case::conflict(StatusCode::CONFLICT, false)]
    fn statuses_split_into_connection_and_query_errors(
        #[case] status: StatusCode,
        #[case] connection: bool,
    ) {
        let err = map_status_error(status, b"{\"error\":\"boom\"}");
        assert_eq!(matches!(err, StoreError::Connection { .. }), connection);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn long_error_bodies_are_truncated_in_messages() {
        let body = "x".repeat(500);
        let err = map_status_error(StatusCode::BAD_REQUEST, body.as_bytes());
        assert!(err.to_string().contains("..."));
        assert!(err.to_string().len() < 300);
    }
}

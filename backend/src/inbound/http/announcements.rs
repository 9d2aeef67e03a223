//! Announcement handlers.
//!
//! Residents read the active announcements straight from the store. Staff
//! work against the [`AnnouncementBoard`], which holds deletes back for an
//! undo window before committing them.

use actix_web::{delete, get, post, put, web, HttpResponse};
use mockable::Clock as _;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AnnouncementRepository as _;
use crate::domain::{
    Announcement, AnnouncementBoard, AnnouncementCategory, Error, NewAnnouncement, RecordId,
    Role,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/announcements`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

/// Body for `PUT /api/v1/announcements/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub is_active: bool,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Staff listing: the visible board plus any delete failure since the last
/// read.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub items: Vec<Announcement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_error: Option<String>,
}

fn validate(title: &str, content: &str) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::invalid_request("a title is required"));
    }
    if content.trim().is_empty() {
        return Err(Error::invalid_request("announcement content is required"));
    }
    Ok(())
}

/// List announcements.
///
/// Staff see the full board with pending deletes hidden; residents see only
/// active announcements.
#[utoipa::path(
    get,
    path = "/api/v1/announcements",
    responses(
        (status = 200, description = "Announcements", body = BoardView),
        (status = 401, description = "Login required", body = ErrorBody)
    ),
    tags = ["announcements"],
    operation_id = "listAnnouncements"
)]
#[get("/announcements")]
pub async fn list_announcements(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<BoardView>> {
    let (_, role) = session.require_identity()?;
    let view = match role {
        Role::Staff => BoardView {
            items: state.board.refresh().await?,
            delete_error: state.board.take_error().map(|err| err.to_string()),
        },
        Role::Resident => BoardView {
            items: state
                .announcements
                .list_active()
                .await
                .map_err(Error::from)?,
            delete_error: None,
        },
    };
    Ok(web::Json(view))
}

/// Publish an announcement (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/announcements",
    request_body = PublishRequest,
    responses(
        (status = 201, description = "Published announcement", body = Announcement),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["announcements"],
    operation_id = "publishAnnouncement"
)]
#[post("/announcements")]
pub async fn publish_announcement(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PublishRequest>,
) -> ApiResult<HttpResponse> {
    let uid = session.require_staff()?;
    let payload = payload.into_inner();
    validate(&payload.title, &payload.content)?;
    let announcement = state
        .board
        .publish(&NewAnnouncement {
            title: payload.title.trim().to_owned(),
            content: payload.content,
            category: payload.category,
            created_by: uid,
            is_active: payload.is_active,
            attachment_url: payload.attachment_url,
        })
        .await?;
    Ok(HttpResponse::Created().json(announcement))
}

/// Edit a published announcement (staff only).
#[utoipa::path(
    put,
    path = "/api/v1/announcements/{id}",
    request_body = EditRequest,
    responses(
        (status = 200, description = "Updated announcement", body = Announcement),
        (status = 403, description = "Staff access required", body = ErrorBody),
        (status = 404, description = "No such announcement", body = ErrorBody)
    ),
    tags = ["announcements"],
    operation_id = "editAnnouncement"
)]
#[put("/announcements/{id}")]
pub async fn edit_announcement(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditRequest>,
) -> ApiResult<web::Json<Announcement>> {
    session.require_staff()?;
    let id = RecordId::new(path.into_inner());
    let mut announcement = state
        .announcements
        .find_by_id(&id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("announcement not found"))?;
    let payload = payload.into_inner();
    validate(&payload.title, &payload.content)?;
    announcement.title = payload.title.trim().to_owned();
    announcement.content = payload.content;
    announcement.category = payload.category;
    announcement.is_active = payload.is_active;
    announcement.attachment_url = payload.attachment_url;
    announcement.updated_at = state.clock.utc();
    state.board.update(&announcement).await?;
    Ok(web::Json(announcement))
}

/// Remove an announcement from the board (staff only).
///
/// The item disappears immediately but the store delete only commits after
/// the undo window; `POST /announcements/undo` cancels it.
#[utoipa::path(
    delete,
    path = "/api/v1/announcements/{id}",
    responses(
        (status = 204, description = "Hidden pending commit"),
        (status = 403, description = "Staff access required", body = ErrorBody),
        (status = 404, description = "No such announcement", body = ErrorBody)
    ),
    tags = ["announcements"],
    operation_id = "deleteAnnouncement"
)]
#[delete("/announcements/{id}")]
pub async fn delete_announcement(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    state.board.delete(&RecordId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Undo the most recent pending delete (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/announcements/undo",
    responses(
        (status = 200, description = "Restored announcement", body = Announcement),
        (status = 404, description = "Nothing pending to undo", body = ErrorBody)
    ),
    tags = ["announcements"],
    operation_id = "undoAnnouncementDelete"
)]
#[post("/announcements/undo")]
pub async fn undo_delete(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Announcement>> {
    session.require_staff()?;
    let restored = state
        .board
        .undo()
        .ok_or_else(|| Error::not_found("no delete is pending"))?;
    Ok(web::Json(restored))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the announcement surface.
    use super::*;
    use crate::inbound::http::test_utils::{
        memory_state, signup_resident, staff_cookie, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    async fn publish(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
        title: &str,
        active: bool,
    ) -> Value {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/announcements")
                .cookie(cookie.clone())
                .set_json(json!({
                    "title": title,
                    "content": "Details inside",
                    "category": "event",
                    "isActive": active
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        test::read_body_json(res).await
    }

    #[actix_web::test]
    async fn residents_only_see_active_announcements() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        let staff = staff_cookie(&state, &app).await;
        publish(&app, &staff, "Fiesta schedule", true).await;
        publish(&app, &staff, "Draft notice", false).await;

        let (resident, _) = signup_resident(&app, "ana@example.com").await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/announcements")
                .cookie(resident)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let items = body["items"].as_array().expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Fiesta schedule");
    }

    #[actix_web::test]
    async fn staff_see_the_full_board() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        let staff = staff_cookie(&state, &app).await;
        publish(&app, &staff, "Fiesta schedule", true).await;
        publish(&app, &staff, "Draft notice", false).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/announcements")
                .cookie(staff)
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    }

    #[actix_web::test]
    async fn delete_hides_the_item_and_undo_restores_it() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        let staff = staff_cookie(&state, &app).await;
        let published = publish(&app, &staff, "Road closure", true).await;
        let id = published["id"].as_str().expect("announcement id").to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/announcements/{id}"))
                .cookie(staff.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/announcements")
                .cookie(staff.clone())
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["items"].as_array().map(Vec::len), Some(0));

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/announcements/undo")
                .cookie(staff.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let restored: Value = test::read_body_json(res).await;
        assert_eq!(restored["id"], id.as_str());

        // A second undo has nothing left to restore.
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/announcements/undo")
                .cookie(staff)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn residents_cannot_publish() {
        let state = memory_state();
        let app = test::init_service(test_app(state)).await;
        let (cookie, _) = signup_resident(&app, "ana@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/announcements")
                .cookie(cookie)
                .set_json(json!({
                    "title": "Not allowed",
                    "content": "x",
                    "category": "other"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn editing_updates_the_stored_announcement() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        let staff = staff_cookie(&state, &app).await;
        let published = publish(&app, &staff, "Old title", true).await;
        let id = published["id"].as_str().expect("announcement id").to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/announcements/{id}"))
                .cookie(staff)
                .set_json(json!({
                    "title": "New title",
                    "content": "Updated body",
                    "category": "alert",
                    "isActive": false
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["title"], "New title");
        assert_eq!(body["isActive"], false);
    }
}

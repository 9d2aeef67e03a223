//! Resident record handlers.
//!
//! Staff manage the full collection; a resident may read and update only
//! their own profile.

use actix_web::{delete, get, put, web, HttpResponse};
use chrono::NaiveDate;
use mockable::Clock as _;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::ResidentRepository as _;
use crate::domain::{CivilStatus, Error, Gender, IdentityId, Resident, Role};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `PUT /api/v1/residents/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResidentRequest {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub address: String,
    pub barangay: String,
    pub phone: String,
    pub civil_status: CivilStatus,
    pub occupation: Option<String>,
}

fn parse_id(raw: &str) -> Result<IdentityId, Error> {
    IdentityId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn require_staff_or_self(
    session: &SessionContext,
    target: &IdentityId,
) -> Result<(), Error> {
    let (uid, role) = session.require_identity()?;
    if role == Role::Staff || &uid == target {
        Ok(())
    } else {
        Err(Error::forbidden("you may only access your own profile"))
    }
}

/// List every resident profile (staff only).
#[utoipa::path(
    get,
    path = "/api/v1/residents",
    responses(
        (status = 200, description = "Residents", body = [Resident]),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["residents"],
    operation_id = "listResidents"
)]
#[get("/residents")]
pub async fn list_residents(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Resident>>> {
    session.require_staff()?;
    let residents = state.residents.list_all().await.map_err(Error::from)?;
    Ok(web::Json(residents))
}

/// Fetch one resident profile (staff, or the resident themselves).
#[utoipa::path(
    get,
    path = "/api/v1/residents/{id}",
    responses(
        (status = 200, description = "Resident", body = Resident),
        (status = 403, description = "Not your profile", body = ErrorBody),
        (status = 404, description = "No such resident", body = ErrorBody)
    ),
    tags = ["residents"],
    operation_id = "getResident"
)]
#[get("/residents/{id}")]
pub async fn get_resident(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Resident>> {
    let id = parse_id(&path)?;
    require_staff_or_self(&session, &id)?;
    let resident = state
        .residents
        .find_by_id(&id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("resident not found"))?;
    Ok(web::Json(resident))
}

/// Overwrite a resident profile (staff, or the resident themselves).
#[utoipa::path(
    put,
    path = "/api/v1/residents/{id}",
    request_body = UpdateResidentRequest,
    responses(
        (status = 200, description = "Updated resident", body = Resident),
        (status = 403, description = "Not your profile", body = ErrorBody),
        (status = 404, description = "No such resident", body = ErrorBody)
    ),
    tags = ["residents"],
    operation_id = "updateResident"
)]
#[put("/residents/{id}")]
pub async fn update_resident(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateResidentRequest>,
) -> ApiResult<web::Json<Resident>> {
    let id = parse_id(&path)?;
    require_staff_or_self(&session, &id)?;
    let mut resident = state
        .residents
        .find_by_id(&id)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("resident not found"))?;
    let payload = payload.into_inner();
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(Error::invalid_request("a name is required"));
    }
    resident.name = name.to_owned();
    resident.date_of_birth = payload.date_of_birth;
    resident.gender = payload.gender;
    resident.address = payload.address;
    resident.barangay = payload.barangay;
    resident.phone = payload.phone;
    resident.civil_status = payload.civil_status;
    resident.occupation = payload.occupation;
    resident.updated_at = state.clock.utc();
    state.residents.upsert(&resident).await.map_err(Error::from)?;
    Ok(web::Json(resident))
}

/// Remove a resident profile (staff only).
#[utoipa::path(
    delete,
    path = "/api/v1/residents/{id}",
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["residents"],
    operation_id = "deleteResident"
)]
#[delete("/residents/{id}")]
pub async fn delete_resident(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = parse_id(&path)?;
    state.residents.delete(&id).await.map_err(Error::from)?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for profile access control.
    use super::*;
    use crate::inbound::http::test_utils::{
        memory_state, signup_resident, staff_cookie, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn residents_read_and_update_their_own_profile() {
        let state = memory_state();
        let app = test::init_service(test_app(state)).await;
        let (cookie, uid) = signup_resident(&app, "ana@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/residents/{uid}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/residents/{uid}"))
                .cookie(cookie)
                .set_json(json!({
                    "name": "Ana Reyes",
                    "gender": "female",
                    "address": "12 Mabini St",
                    "barangay": "San Isidro",
                    "phone": "0917-000-0000",
                    "civilStatus": "married"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["name"], "Ana Reyes");
        assert_eq!(body["civilStatus"], "married");
    }

    #[actix_web::test]
    async fn residents_cannot_touch_other_profiles() {
        let state = memory_state();
        let app = test::init_service(test_app(state)).await;
        let (_, other_uid) = signup_resident(&app, "ben@example.com").await;
        let (cookie, _) = signup_resident(&app, "ana@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/residents/{other_uid}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn staff_list_and_delete_profiles() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        let (_, uid) = signup_resident(&app, "ana@example.com").await;
        let cookie = staff_cookie(&state, &app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/residents")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/residents/{uid}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/residents/{uid}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

//! Cookie-session helpers keeping handlers free of framework detail.
//!
//! The cookie stores the signed-in identity uid and its resolved role; role
//! checks for staff- and resident-only routes live here so handlers stay
//! declarative.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, IdentityId, Role};

pub(crate) const UID_KEY: &str = "uid";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper exposing portal-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in identity and its role in the cookie.
    pub fn persist(&self, uid: &IdentityId, role: Role) -> Result<(), Error> {
        self.0
            .insert(UID_KEY, uid.as_ref())
            .and_then(|()| self.0.insert(ROLE_KEY, role))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in identity uid, if any.
    pub fn identity_id(&self) -> Result<Option<IdentityId>, Error> {
        let raw = self
            .0
            .get::<String>(UID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match IdentityId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid identity id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// The role recorded at login, if any.
    pub fn role(&self) -> Result<Option<Role>, Error> {
        self.0
            .get::<Role>(ROLE_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require a signed-in session or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<(IdentityId, Role), Error> {
        let uid = self
            .identity_id()?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        let role = self
            .role()?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        Ok((uid, role))
    }

    /// Require a staff session or return `403 Forbidden`.
    pub fn require_staff(&self) -> Result<IdentityId, Error> {
        let (uid, role) = self.require_identity()?;
        if role != Role::Staff {
            return Err(Error::forbidden("staff access required"));
        }
        Ok(uid)
    }

    /// Require a resident session or return `403 Forbidden`.
    pub fn require_resident(&self) -> Result<IdentityId, Error> {
        let (uid, role) = self.require_identity()?;
        if role != Role::Resident {
            return Err(Error::forbidden("resident access required"));
        }
        Ok(uid)
    }

    /// Destroy the session outright. Logout uses this so no stale state
    /// survives the response.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for session round trips and role checks.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    #[actix_web::test]
    async fn round_trips_identity_and_role() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        let uid = IdentityId::new("res-1").expect("fixture uid");
                        session.persist(&uid, Role::Resident)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let (uid, role) = session.require_identity()?;
                        Ok::<_, Error>(
                            HttpResponse::Ok().body(format!("{uid}:{role:?}")),
                        )
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let whoami = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(whoami.status(), StatusCode::OK);
        let body = test::read_body(whoami).await;
        assert_eq!(body, "res-1:Resident");
    }

    #[actix_web::test]
    async fn anonymous_sessions_are_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/staff",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_staff()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/staff").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn residents_cannot_pass_the_staff_check() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        let uid = IdentityId::new("res-1").expect("fixture uid");
                        session.persist(&uid, Role::Resident)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/staff",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_staff()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/staff")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}

/// HTTP middleware for video-service
///
/// `BearerAuth` resolves the acting owner from `Authorization: Bearer <token>`.
/// Tokens embed the owner id after the first `_` (`<secret>_<owner id>`); the
/// owner is looked up and the whole token must equal the stored one.
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::db::UserRepository;
use crate::error::{AppError, Result as AppResult};
use crate::models::OwnerId;

#[derive(Clone)]
pub struct BearerAuth {
    users: Arc<dyn UserRepository>,
}

impl BearerAuth {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service: Rc::new(service),
            users: self.users.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    users: Arc<dyn UserRepository>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let users = self.users.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            match authenticate(users.as_ref(), header.as_deref()).await {
                Ok(owner) => {
                    req.extensions_mut().insert(owner);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                // Rejected requests never reach the inner service
                Err(err) => {
                    if err.is_unexpected() {
                        tracing::error!("owner lookup failed: {}", err);
                    }
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Split a header into `(token, owner id fragment)`
pub fn parse_credential(header: &str) -> Option<(&str, &str)> {
    let token = header.strip_prefix("Bearer ")?.split(' ').next()?;
    let owner = token.split('_').nth(1).filter(|id| !id.is_empty())?;
    Some((token, owner))
}

/// Resolve the acting owner. Any parse failure, unknown owner or token
/// mismatch is `Unauthorized`; registry failures propagate as-is.
pub async fn authenticate(users: &dyn UserRepository, header: Option<&str>) -> AppResult<OwnerId> {
    let (token, owner_id) = header
        .and_then(parse_credential)
        .ok_or(AppError::Unauthorized)?;

    let user = users
        .find_by_id(owner_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if user.token.as_bytes() != token.as_bytes() {
        tracing::debug!(owner_id, "bearer token mismatch");
        return Err(AppError::Unauthorized);
    }

    Ok(OwnerId(user.id))
}

impl FromRequest for OwnerId {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<OwnerId>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized.into()),
        )
    }
}

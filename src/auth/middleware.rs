use crate::db::models::User;
use crate::error::{AppError, AuthError};
use crate::AppState;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use tracing::debug;

/// Paths reachable without a token: login, register, health and the API
/// documentation. Prefix-matched, so `/api-docs/openapi.json` is public too.
const PUBLIC_PATHS: &[&str] = &["/login", "/register", "/health", "/api-docs"];

pub(crate) fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|public| {
        path == *public || path.strip_prefix(public).is_some_and(|rest| rest.starts_with('/'))
    })
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Request-interception gate. Runs once per request, strictly before route
/// dispatch: allowlisted paths pass untouched; otherwise the bearer token is
/// resolved to an identity and attached to the request. Every failure kind
/// (missing header, malformed or expired token, unknown identity, store
/// error) collapses to "no identity attached" — rejection is left to the
/// route-level policy, i.e. the [`AuthenticatedUser`] extractor.
pub struct AuthenticationGate;

impl<S, B> Transform<S, ServiceRequest> for AuthenticationGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = AuthenticationGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticationGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_path(req.path()) {
                return service.call(req).await;
            }

            if let Some(token) = bearer_token(req.request()) {
                let state = req.app_data::<web::Data<AppState>>().cloned();
                if let Some(state) = state {
                    match state.auth.validate_token(&token).await {
                        Ok(user) => {
                            req.extensions_mut().insert(user);
                        }
                        Err(e) => {
                            // Never mutates store or token state, never
                            // escapes as a fault. The request simply stays
                            // unauthenticated.
                            debug!("Request left unauthenticated: {}", e);
                        }
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Route-level policy for protected handlers: extracts the identity the gate
/// attached, or rejects with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<User>()
                .cloned()
                .map(AuthenticatedUser)
                .ok_or_else(|| AuthError::Unauthenticated.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_public_path_matching() {
        assert!(is_public_path("/login"));
        assert!(is_public_path("/register"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api-docs"));
        assert!(is_public_path("/api-docs/openapi.json"));

        assert!(!is_public_path("/tasks"));
        assert!(!is_public_path("/tasks/1"));
        assert!(!is_public_path("/loginx"));
        assert!(!is_public_path("/registered"));
        assert!(!is_public_path("/"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer abc"))
            .to_http_request();
        // Scheme is case-sensitive, anything else is treated as absent.
        assert_eq!(bearer_token(&req), None);
    }
}

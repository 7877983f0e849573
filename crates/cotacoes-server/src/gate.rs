//! Authentication gate
//!
//! Classifies every inbound request as authenticated or rejected, and
//! manages the one-time upgrade from bootstrap token to session. Runs
//! as a middleware layer in front of every route.

use crate::error::ApiError;
use crate::services::bootstrap::Redemption;
use crate::services::sessions::SESSION_LIFETIME_HOURS;
use crate::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use cotacoes_core::ports::Verification;
use cotacoes_core::CotacaoError;

const SESSION_COOKIE: &str = "sid";

/// Paths that never require a credential: service metadata, health
/// check, and the bootstrap-token issuance endpoint.
const PUBLIC_PATHS: &[&str] = &["/", "/health", "/api/auth/generate-token"];

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Public allow-list and metadata-only probes pass unconditionally.
    if PUBLIC_PATHS.contains(&req.uri().path())
        || req.method() == Method::HEAD
        || req.method() == Method::OPTIONS
    {
        return next.run(req).await;
    }

    // 2. Transport-level session state.
    let presented_sid = session_cookie(req.headers());
    if let Some(sid) = &presented_sid {
        if state.sessions.is_authenticated(sid) {
            return next.run(req).await;
        }
    }

    // 3. Presented credential: query parameter takes precedence over
    //    the Authorization header.
    let query_cred = query_token(req.uri());
    let credential = match query_cred.clone().or_else(|| bearer_token(req.headers())) {
        Some(credential) => credential,
        None => {
            let message = if presented_sid.is_some() {
                "session expired"
            } else {
                "no credential presented"
            };
            return unauthorized(message);
        }
    };

    // Bootstrap upgrade: used or unknown tokens fall through to the
    // verifier chain; a known-but-expired token gets its own message.
    match state.bootstrap.redeem(&credential) {
        Redemption::Granted => {
            let session = state.sessions.create();
            let cookie = session_set_cookie(&session.id);
            if query_cred.is_some() {
                // Redirect to the same path stripped of the token parameter.
                let location = strip_token_param(req.uri());
                return (
                    StatusCode::SEE_OTHER,
                    [(header::SET_COOKIE, cookie), (header::LOCATION, location)],
                )
                    .into_response();
            }
            let mut response = next.run(req).await;
            if let Ok(value) = cookie.parse() {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            return response;
        }
        Redemption::Expired => return unauthorized("bootstrap token expired"),
        Redemption::Unknown => {}
    }

    match state.auth.verify_credential(&credential) {
        Verification::Accepted(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Verification::Rejected => {
            ApiError(CotacaoError::Forbidden("invalid credential".to_string())).into_response()
        }
    }
}

fn unauthorized(message: &str) -> Response {
    ApiError(CotacaoError::Unauthorized(message.to_string())).into_response()
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("sid=").map(str::to_string))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn query_token(uri: &Uri) -> Option<String> {
    uri.query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token=").map(str::to_string))
}

fn strip_token_param(uri: &Uri) -> String {
    let rest: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("token="))
        .collect();
    if rest.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), rest.join("&"))
    }
}

fn session_set_cookie(id: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly",
        SESSION_COOKIE,
        id,
        SESSION_LIFETIME_HOURS * 3600
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::Claims;
    use crate::services::BootstrapRegistry;
    use crate::storage::MemoryStore;
    use crate::test_util::{self, JWT_SECRET, STATIC_TOKEN};
    use axum::body::Body;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn public_paths_require_no_credential() {
        for path in ["/", "/health"] {
            let response = test_util::app().oneshot(get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "path {}", path);
        }
    }

    #[tokio::test]
    async fn head_probe_requires_no_credential() {
        let request = Request::builder()
            .method(Method::HEAD)
            .uri("/api/cotacoes")
            .body(Body::empty())
            .unwrap();
        let response = test_util::app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_credential_is_unauthorized() {
        let response = test_util::app().oneshot(get("/api/cotacoes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "no credential presented");
    }

    #[tokio::test]
    async fn static_token_is_accepted() {
        let request = Request::builder()
            .uri("/api/cotacoes")
            .header(header::AUTHORIZATION, format!("Bearer {}", STATIC_TOKEN))
            .body(Body::empty())
            .unwrap();
        let response = test_util::app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn signed_token_is_accepted() {
        let now = Utc::now();
        let claims = Claims {
            sub: "maria".to_string(),
            name: "Maria Silva".to_string(),
            admin: false,
            exp: (now + Duration::minutes(5)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();

        let request = Request::builder()
            .uri("/api/cotacoes")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = test_util::app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_credential_is_forbidden() {
        let request = Request::builder()
            .uri("/api/cotacoes")
            .header(header::AUTHORIZATION, "Bearer nonsense")
            .body(Body::empty())
            .unwrap();
        let response = test_util::app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn bootstrap_token_upgrades_to_session_and_redirects() {
        let state = test_util::state();
        let app = crate::build_router(state.clone());
        let token = state.bootstrap.issue();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/cotacoes?token={}", token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/cotacoes"
        );

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let sid = cookie
            .split(';')
            .next()
            .unwrap()
            .strip_prefix("sid=")
            .unwrap()
            .to_string();

        // The established session authenticates follow-up requests.
        let request = Request::builder()
            .uri("/api/cotacoes")
            .header(header::COOKIE, format!("sid={}", sid))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Redeeming the same token a second time fails even within the
        // validity window.
        let response = app
            .oneshot(get(&format!("/api/cotacoes?token={}", token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn redirect_preserves_other_query_parameters() {
        let state = test_util::state();
        let app = crate::build_router(state.clone());
        let token = state.bootstrap.issue();

        let response = app
            .oneshot(get(&format!("/api/cotacoes?limit=5&token={}", token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/cotacoes?limit=5"
        );
    }

    #[tokio::test]
    async fn bootstrap_token_in_header_continues_with_cookie() {
        let state = test_util::state();
        let app = crate::build_router(state.clone());
        let token = state.bootstrap.issue();

        let request = Request::builder()
            .uri("/api/cotacoes")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn expired_bootstrap_token_is_explained() {
        let bootstrap = Arc::new(BootstrapRegistry::with_window(Duration::milliseconds(-1)));
        let state = test_util::state_with(Arc::new(MemoryStore::new()), bootstrap.clone());
        let app = crate::build_router(state);
        let token = bootstrap.issue();

        let response = app
            .oneshot(get(&format!("/api/cotacoes?token={}", token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bootstrap token expired");
    }

    #[tokio::test]
    async fn stale_session_cookie_is_explained() {
        let request = Request::builder()
            .uri("/api/cotacoes")
            .header(header::COOKIE, "sid=long-gone")
            .body(Body::empty())
            .unwrap();
        let response = test_util::app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "session expired");
    }
}

use async_trait::async_trait;
use railbook_core::{
    AuthApi, AuthResponse, CoreResult, Credentials, OtpDispatch, OtpVerification, RegisterRequest, User,
};
use serde::{Deserialize, Serialize};

use crate::http_client::ApiClient;

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: User,
}

#[derive(Serialize)]
struct OtpRequest<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct OtpCheck<'a> {
    phone: &'a str,
    otp: &'a str,
}

/// Auth service over HTTP. Successful login and registration sign the
/// shared session in, so later requests carry the new token.
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn remember(&self, response: &AuthResponse) {
        self.client
            .session()
            .sign_in(response.token.expose().clone(), response.user.clone());
        tracing::info!(user_id = response.user.id, email = %response.user.email, "signed in");
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(&self, request: &RegisterRequest) -> CoreResult<AuthResponse> {
        let response: AuthResponse = self.client.post("/api/auth/register", request).await?;
        self.remember(&response);
        Ok(response)
    }

    async fn login(&self, credentials: &Credentials) -> CoreResult<AuthResponse> {
        let response: AuthResponse = self.client.post("/api/auth/login", credentials).await?;
        self.remember(&response);
        Ok(response)
    }

    async fn me(&self) -> CoreResult<User> {
        let response: MeResponse = self.client.get("/api/auth/me").await?;
        Ok(response.user)
    }

    async fn request_otp(&self, phone: &str) -> CoreResult<OtpDispatch> {
        Ok(self.client.post("/api/auth/otp/request", &OtpRequest { phone }).await?)
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> CoreResult<OtpVerification> {
        Ok(self.client.post("/api/auth/otp/verify", &OtpCheck { phone, otp }).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use railbook_core::{CoreError, SessionContext};
    use railbook_shared::Masked;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn user_json() -> Value {
        json!({
            "id": 7,
            "email": "nadia@example.com",
            "phone": "01812345678",
            "name": "Nadia",
            "created_at": "2026-10-01T10:00:00"
        })
    }

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["password"] != "secret" {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" })));
        }
        (
            StatusCode::OK,
            Json(json!({ "message": "Login successful", "token": "jwt-7", "user": user_json() })),
        )
    }

    async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer jwt-7") => (StatusCode::OK, Json(json!({ "user": user_json() }))),
            _ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Token is missing" }))),
        }
    }

    async fn otp_request(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["phone"], "01812345678");
        Json(json!({ "message": "OTP sent successfully", "otp": "123456", "expires_in": 300 }))
    }

    async fn otp_verify(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["otp"] == "123456" {
            (StatusCode::OK, Json(json!({ "message": "OTP verified successfully", "verified": true })))
        } else {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid OTP" })))
        }
    }

    async fn auth_api() -> (HttpAuthApi, Arc<SessionContext>) {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/auth/otp/request", post(otp_request))
            .route("/api/auth/otp/verify", post(otp_verify));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let session = Arc::new(SessionContext::new());
        let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(5), session.clone()).unwrap();
        (HttpAuthApi::new(client), session)
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "nadia@example.com".to_string(),
            password: Masked::new(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_signs_session_in_and_me_uses_token() {
        let (api, session) = auth_api().await;

        assert!(matches!(api.me().await, Err(CoreError::IdentityError(_))));

        let response = api.login(&credentials("secret")).await.unwrap();
        assert_eq!(response.user.id, 7);
        assert_eq!(session.token().as_deref(), Some("jwt-7"));

        let me = api.me().await.unwrap();
        assert_eq!(me.phone.as_deref(), Some("01812345678"));
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_session_empty() {
        let (api, session) = auth_api().await;

        let err = api.login(&credentials("wrong")).await.unwrap_err();
        assert!(matches!(err, CoreError::IdentityError(ref msg) if msg == "Invalid credentials"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_otp_round_trip() {
        let (api, _) = auth_api().await;

        let dispatch = api.request_otp("01812345678").await.unwrap();
        assert_eq!(dispatch.expires_in, 300);
        assert_eq!(dispatch.otp.unwrap().expose(), "123456");

        assert!(api.verify_otp("01812345678", "123456").await.unwrap().verified);
        assert!(matches!(
            api.verify_otp("01812345678", "999999").await,
            Err(CoreError::ValidationError(_))
        ));
    }
}

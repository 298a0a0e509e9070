// SPDX-License-Identifier: MPL-2.0
//! Account endpoints: registration, login, password reset, and the two
//! remote field validators used during signup.

use super::client::ApiClient;
use super::error::ApiError;
use super::session::TokenPair;
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirmRequest {
    pub new_password1: String,
    pub new_password2: String,
    pub uid: String,
    pub token: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ValidateUsernameRequest<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct ValidatePasswordRequest<'a> {
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct UsernameAvailability {
    is_available: bool,
}

impl ApiClient {
    /// POST /api/auth/register/
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, "/api/auth/register/").json(request))
            .await?;
        Ok(())
    }

    /// POST /api/auth/login/
    ///
    /// On success the returned token pair is handed to the session store;
    /// a persistence failure is logged but does not fail the login, since
    /// the in-process session remains usable.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let tokens: TokenPair = self
            .execute_json(
                self.request(Method::POST, "/api/auth/login/")
                    .json(&LoginRequest { username, password }),
            )
            .await?;

        if let Err(err) = self.session().store(tokens.clone()) {
            log::warn!("failed to persist session: {}", err);
        }

        Ok(tokens)
    }

    /// Forgets the stored session.
    pub fn logout(&self) {
        if let Err(err) = self.session().clear() {
            log::warn!("failed to clear session: {}", err);
        }
    }

    /// POST /api/auth/password-reset/
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        self.execute(
            self.request(Method::POST, "/api/auth/password-reset/")
                .json(&PasswordResetRequest { email }),
        )
        .await?;
        Ok(())
    }

    /// POST /api/user-auth/password-reset-confirm/
    pub async fn confirm_password_reset(
        &self,
        request: &PasswordResetConfirmRequest,
    ) -> Result<(), ApiError> {
        self.execute(
            self.request(Method::POST, "/api/user-auth/password-reset-confirm/")
                .json(request),
        )
        .await?;
        Ok(())
    }

    /// POST /api/auth/validate-username/
    ///
    /// `Ok(false)` means the name is taken; transport and server failures
    /// surface as `Err` so callers can show a distinct generic message.
    pub async fn validate_username(&self, username: &str) -> Result<bool, ApiError> {
        let availability: UsernameAvailability = self
            .execute_json(
                self.request(Method::POST, "/api/auth/validate-username/")
                    .json(&ValidateUsernameRequest { username }),
            )
            .await?;
        Ok(availability.is_available)
    }

    /// POST /api/auth/validate-password/
    ///
    /// `Ok(None)` means the password satisfies the policy; `Ok(Some(..))`
    /// carries the ordered list of violation messages.
    pub async fn validate_password(
        &self,
        password: &str,
    ) -> Result<Option<Vec<String>>, ApiError> {
        let body: serde_json::Value = self
            .execute_json(
                self.request(Method::POST, "/api/auth/validate-password/")
                    .json(&ValidatePasswordRequest { password }),
            )
            .await?;

        let violations = body.get("detail").and_then(|detail| detail.as_array()).map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        });

        Ok(violations.filter(|messages| !messages.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_serializes_service_field_names() {
        let request = RegisterRequest {
            username: "ada".into(),
            email: "ada@example.org".into(),
            password1: "correct horse".into(),
            password2: "correct horse".into(),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["username"], "ada");
        assert_eq!(json["password1"], "correct horse");
        assert_eq!(json["password2"], "correct horse");
    }

    #[test]
    fn reset_confirm_request_carries_uid_and_token() {
        let request = PasswordResetConfirmRequest {
            new_password1: "p1".into(),
            new_password2: "p1".into(),
            uid: "Mg".into(),
            token: "abc-def".into(),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["new_password1"], "p1");
        assert_eq!(json["uid"], "Mg");
        assert_eq!(json["token"], "abc-def");
    }
}

/*
[INPUT]:  User credentials and the shared auth context
[OUTPUT]: Bearer token installed in the context, user profiles
[POS]:    HTTP layer - account endpoints (login, register, current user)
[UPDATE]: When auth endpoints or payloads change
*/

// ### Account Endpoints

use reqwest::Method;
use tracing::info;

use crate::auth::SessionToken;
use crate::http::client::Access;
use crate::http::{Result, SoliforgeClient};
use crate::types::{LoginForm, RegisterRequest, TokenResponse, UserProfile};

impl SoliforgeClient {
    /// Exchange credentials for a bearer token and install it.
    ///
    /// POST /auth/token (form: username, password)
    ///
    /// Bad credentials come back as an ordinary API error with the server's
    /// detail, never as `Unauthenticated`.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let builder = self
            .request(Method::POST, "auth/token", Access::Public)?
            .form(&form);
        let token: TokenResponse = self.send_json(builder, Access::Public).await?;

        self.auth()
            .set_token(SessionToken::new(&token.access_token, &token.token_type));
        info!(username, "signed in");
        Ok(token)
    }

    /// POST /auth/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        let builder = self
            .request(Method::POST, "auth/register", Access::Public)?
            .json(request);
        let profile: UserProfile = self.send_json(builder, Access::Public).await?;
        info!(username = %profile.username, "account registered");
        Ok(profile)
    }

    /// GET /auth/me
    pub async fn me(&self) -> Result<UserProfile> {
        let builder = self.request(Method::GET, "auth/me", Access::Bearer)?;
        self.send_json(builder, Access::Bearer).await
    }

    /// Forget the local token; the backend keeps no session to end
    pub fn logout(&self) {
        self.auth().clear();
    }
}

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use anyhow::Context;
use chrono::{Duration, Utc};
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::url::Url;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl,
    RefreshToken, TokenResponse, TokenUrl,
};

use super::OauthClient;
use crate::store::{ClientSecrets, StoredCredential};

pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

pub struct GoogleOauthClient {
    inner: BasicClient,
}

impl GoogleOauthClient {
    pub fn new(secrets: &ClientSecrets) -> anyhow::Result<Self> {
        let auth_url = AuthUrl::new(secrets.auth_uri.clone())
            .context("invalid authorization endpoint URL in client secrets")?;
        let token_url = TokenUrl::new(secrets.token_uri.clone())
            .context("invalid token endpoint URL in client secrets")?;

        let client = BasicClient::new(
            ClientId::new(secrets.client_id.clone()),
            Some(ClientSecret::new(secrets.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        Ok(Self { inner: client })
    }

    /// Exchanges the stored refresh token for a fresh access token. The token
    /// endpoint may or may not rotate the refresh token; when it doesn't, the
    /// old one is carried over.
    pub async fn refresh_credential(
        &self,
        creds: StoredCredential,
    ) -> anyhow::Result<StoredCredential> {
        let refresh_token = creds
            .refresh_token
            .clone()
            .context("no refresh token on stored credential")?;

        let token = self
            .inner
            .exchange_refresh_token(&RefreshToken::new(refresh_token))
            .request_async(async_http_client)
            .await
            .context("refreshing access token failed")?;

        Ok(StoredCredential {
            access_token: token.access_token().secret().to_owned(),
            refresh_token: token
                .refresh_token()
                .map(|t| t.secret().to_owned())
                .or(creds.refresh_token),
            scopes: scopes_or(&token, creds.scopes),
            expiry: token.expires_in().map(|ttl| {
                Utc::now() + Duration::from_std(ttl).unwrap_or_else(|_| Duration::hours(1))
            }),
        })
    }

    /// Runs the interactive installed-app flow: opens the consent page in a
    /// browser and waits for the single redirect back to a loopback listener
    /// bound to an ephemeral port. Blocks until the user acts or cancels.
    pub async fn run_installed_flow(&self) -> anyhow::Result<StoredCredential> {
        // A very naive implementation of the redirect server.
        let listener =
            TcpListener::bind("127.0.0.1:0").context("failed to bind loopback listener")?;
        let port = listener.local_addr()?.port();

        let client = self.inner.clone().set_redirect_uri(
            RedirectUrl::new(format!("http://localhost:{port}")).context("invalid redirect URL")?,
        );

        let (authorize_url, csrf_state, pkce_code_verifier) = client.get_authorization_url(
            vec![CALENDAR_READONLY_SCOPE],
            // offline + consent so Google hands back a refresh token
            vec![("access_type", "offline"), ("prompt", "consent")],
        );

        println!("Opening: {authorize_url}");
        webbrowser::open(authorize_url.as_str()).context("failed to open web browser")?;

        let (mut stream, _) = listener
            .accept()
            .context("failed to accept authorization callback")?;

        let (code, state) = {
            let mut reader = BufReader::new(&stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line)?;

            let redirect_path = request_line
                .split_whitespace()
                .nth(1)
                .context("malformed callback request line")?;
            let url = Url::parse(&format!("http://localhost{redirect_path}"))?;

            let code = url
                .query_pairs()
                .find(|(key, _)| key == "code")
                .map(|(_, value)| AuthorizationCode::new(value.into_owned()))
                .context("authorization was cancelled: callback carried no code")?;

            let state = url
                .query_pairs()
                .find(|(key, _)| key == "state")
                .map(|(_, value)| CsrfToken::new(value.into_owned()))
                .context("callback carried no state parameter")?;

            (code, state)
        };

        let message = "<html><body>
        <script type=\"text/javascript\">
          window.close() ;
        </script>
        </body></html>";
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{}",
            message.len(),
            message
        );
        stream.write_all(response.as_bytes())?;

        if state.secret() != csrf_state.secret() {
            anyhow::bail!("authorization state mismatch, discarding callback");
        }

        // Exchange the code with a token.
        let token = client
            .exchange_code(code)
            // Send the PKCE code verifier in the token request
            .set_pkce_verifier(pkce_code_verifier)
            .request_async(async_http_client)
            .await
            .context("authorization code exchange failed")?;

        Ok(StoredCredential {
            access_token: token.access_token().secret().to_owned(),
            refresh_token: token.refresh_token().map(|t| t.secret().to_owned()),
            scopes: scopes_or(&token, vec![CALENDAR_READONLY_SCOPE.to_owned()]),
            expiry: token.expires_in().map(|ttl| {
                Utc::now() + Duration::from_std(ttl).unwrap_or_else(|_| Duration::hours(1))
            }),
        })
    }
}

fn scopes_or(token: &oauth2::basic::BasicTokenResponse, fallback: Vec<String>) -> Vec<String> {
    match token.scopes() {
        Some(scopes) => scopes.iter().map(|s| s.as_str().to_owned()).collect(),
        None => fallback,
    }
}

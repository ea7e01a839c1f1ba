pub mod google;

use std::path::Path;

use chrono::Utc;
use oauth2::basic::BasicClient;
use oauth2::{CsrfToken, PkceCodeChallenge, Scope};

use crate::store::{ClientSecrets, StoredCredential};
use google::GoogleOauthClient;

pub trait OauthClient {
    fn get_authorization_url(
        &self,
        scopes: Vec<&str>,
        extra_params: Vec<(&str, &str)>,
    ) -> (
        oauth2::url::Url,
        oauth2::CsrfToken,
        oauth2::PkceCodeVerifier,
    );
}

impl OauthClient for BasicClient {
    fn get_authorization_url(
        &self,
        scopes: Vec<&str>,
        extra_params: Vec<(&str, &str)>,
    ) -> (
        oauth2::url::Url,
        oauth2::CsrfToken,
        oauth2::PkceCodeVerifier,
    ) {
        // Proof Key for Code Exchange (PKCE - https://oauth.net/2/pkce/).
        // Create a PKCE code verifier and SHA-256 encode it as a code challenge.
        let (pkce_code_challenge, pkce_code_verifier) = PkceCodeChallenge::new_random_sha256();

        let s = scopes
            .iter()
            .map(|f| Scope::new(f.to_string()))
            .collect::<Vec<_>>();
        let mut auth_request = self
            .authorize_url(CsrfToken::new_random)
            .add_scopes(s.into_iter());

        for (name, value) in extra_params {
            auth_request = auth_request.add_extra_param(name.to_owned(), value.to_owned());
        }

        // Generate the authorization URL to which we'll redirect the user.
        let (authorize_url, csrf_state) =
            auth_request.set_pkce_challenge(pkce_code_challenge).url();

        (authorize_url, csrf_state, pkce_code_verifier)
    }
}

/// Produces a valid credential for the read-only calendar scope, running
/// whatever part of the token lifecycle the stored state calls for.
///
/// A credential produced by a refresh or by the interactive flow is written
/// back to `token_path` before this returns, so the event query that follows
/// always runs against persisted state. Failures here are fatal to the caller.
pub async fn ensure_credential(
    secrets_path: &Path,
    token_path: &Path,
) -> anyhow::Result<StoredCredential> {
    let stored = StoredCredential::load(token_path)?;

    if let Some(creds) = &stored {
        if creds.is_valid(Utc::now()) {
            return Ok(creds.clone());
        }
    }

    let secrets = ClientSecrets::load(secrets_path)?;
    let client = GoogleOauthClient::new(&secrets)?;

    let creds = match stored {
        Some(creds) if creds.expiry.is_some() && creds.refresh_token.is_some() => {
            client.refresh_credential(creds).await?
        }
        _ => client.run_installed_flow().await?,
    };

    creds.save(token_path)?;
    Ok(creds)
}

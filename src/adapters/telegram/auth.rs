//! Interactive login flow: phone -> code -> optional 2FA password.
//!
//! Session bootstrapping glue. Prompts only when the stored session is not
//! authorized; an authorized session makes this a no-op.

use grammers_client::{Client, SignInError};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::info;

use crate::domain::OsintError;

fn prompt_err(e: inquire::InquireError) -> OsintError {
    OsintError::Auth(e.to_string())
}

/// Ensure the client is authorized, running the login flow if needed.
pub async fn ensure_login(
    client: &Client,
    phone: Option<&str>,
    api_hash: &str,
) -> Result<(), OsintError> {
    if client
        .is_authorized()
        .await
        .map_err(|e| OsintError::Auth(e.to_string()))?
    {
        return Ok(());
    }

    let phone = match phone {
        Some(p) => p.to_string(),
        None => Text::new("Phone number (international format):")
            .prompt()
            .map_err(prompt_err)?,
    };
    info!("requesting login code");
    let token = client
        .request_login_code(&phone, api_hash)
        .await
        .map_err(|e| OsintError::Auth(format!("request_login_code: {e}")))?;

    let code = Text::new("Login code:").prompt().map_err(prompt_err)?;
    match client.sign_in(&token, &code).await {
        Ok(_) => {
            info!("signed in");
            Ok(())
        }
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().map(String::from).unwrap_or_default();
            let label = if hint.is_empty() {
                "2FA password:".to_string()
            } else {
                format!("2FA password (hint: {hint}):")
            };
            let password = Password::new(&label)
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()
                .map_err(prompt_err)?;
            client
                .check_password(password_token, password.as_bytes())
                .await
                .map_err(|e| OsintError::Auth(format!("check_password: {e}")))?;
            info!("signed in with 2FA");
            Ok(())
        }
        Err(SignInError::InvalidCode) => Err(OsintError::Auth(
            "Invalid login code. Run again and enter the correct code.".into(),
        )),
        Err(SignInError::SignUpRequired) => Err(OsintError::Auth(
            "Sign-up required. Create an account with the official Telegram app first.".into(),
        )),
        Err(e) => Err(OsintError::Auth(format!("sign in: {e}"))),
    }
}

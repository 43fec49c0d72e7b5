//! Account commands

use super::{dashboard, emit, failed, AuthCommand, Report};
use crate::app::AppState;
use crate::error::AppError;
use crate::store::SignUpOutcome;
use crate::views::{resolve, Route, Toast};
use std::io::Write;

pub async fn run<W: Write>(state: &AppState, command: AuthCommand, out: &mut W) -> Report {
    match command {
        AuthCommand::SignIn { email, password } => {
            if let Some(report) = already_signed_in(state, out).await {
                return report;
            }

            match state.auth.sign_in(&email, &password).await {
                Ok(session) => {
                    emit(out, format!("Signed in as {}", session.email))?;
                    Ok(Some(Toast::welcome_back()))
                }
                Err(e) => Err(failed("Sign in", &e, Toast::login_failed(auth_message(&e)))),
            }
        }
        AuthCommand::SignUp {
            email,
            password,
            display_name,
        } => {
            if let Some(report) = already_signed_in(state, out).await {
                return report;
            }

            match state
                .auth
                .sign_up(&email, &password, display_name.as_deref())
                .await
            {
                Ok(SignUpOutcome::SignedIn(session)) => {
                    emit(out, format!("Signed in as {}", session.email))?;
                    Ok(Some(Toast::account_created()))
                }
                Ok(SignUpOutcome::ConfirmationRequired { email }) => {
                    Ok(Some(Toast::confirm_email(&email)))
                }
                Err(e) => Err(failed("Sign up", &e, Toast::signup_failed(auth_message(&e)))),
            }
        }
        AuthCommand::SignOut => match state.auth.sign_out().await {
            Ok(()) => {
                emit(out, "Signed out")?;
                Ok(None)
            }
            Err(AppError::NotSignedIn) => Err(Toast::sign_in_required()),
            Err(e) => Err(failed("Sign out", &e, Toast::logout_failed())),
        },
        AuthCommand::Whoami => match state.auth.current_session().await {
            Some(session) => {
                emit(out, format!("{} <{}>", session.greeting_name(), session.email))?;
                Ok(None)
            }
            None => Err(Toast::sign_in_required()),
        },
    }
}

/// Signed-in users asking for the auth page land on the dashboard instead
async fn already_signed_in<W: Write>(state: &AppState, out: &mut W) -> Option<Report> {
    if resolve(Route::Auth, state.auth.is_signed_in().await) != Route::Dashboard {
        return None;
    }

    let session = state.auth.current_session().await?;
    if let Err(toast) = emit(out, format!("Already signed in as {}", session.email)) {
        return Some(Err(toast));
    }
    Some(dashboard::show(state, &session, out).await)
}

/// The provider's own message, without the error-kind prefix
fn auth_message(error: &AppError) -> String {
    match error {
        AppError::Auth(message) | AppError::Validation(message) => message.clone(),
        AppError::Remote { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

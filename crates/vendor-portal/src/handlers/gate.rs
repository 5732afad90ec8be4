//! Login, logout, password reset and registration.

use axum::extract::{Extension, Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use http::StatusCode;
use http::header::SET_COOKIE;

use vendor_auth::{
    AuthError, LoginForm, PasswordCheck, RegisterForm, RegisteredUser, ResetPasswordForm, Session,
};

use super::{PortalRender, error_page, login_page, portal_page};
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::pages::Notice;
use crate::state::AppState;

/// Shown after a successful reset.
pub const PASSWORD_MODIFIED: &str = "Password modified successfully";

/// Shown after a successful registration.
pub const USER_REGISTERED: &str = "User registered successfully";

/// `GET /`: the vendor page for a logged-in user, the login page otherwise.
pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    if session.is_authenticated() {
        portal_page(&state, &session, PortalRender::default()).await
    } else {
        login_page(&state, StatusCode::OK, None)
    }
}

/// `POST /login`
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let session = match open_session(&state, &form).await {
        Ok(session) => session,
        Err(PortalError::Auth(e)) if e.is_client_error() => {
            tracing::info!(username = %form.username, status = ?e.login_status(), "Login refused");
            return login_page(&state, StatusCode::OK, Some(Notice::error(e.to_string())));
        }
        Err(e) => return error_page(&state, e),
    };

    let codec = state.authenticator.codec();
    let name = session.name.as_deref().unwrap_or_default();
    let token = match codec.issue(&form.username, name) {
        Ok(token) => token,
        Err(e) => return error_page(&state, e.into()),
    };
    tracing::info!(username = %form.username, "Session opened");
    let cookie = [(SET_COOKIE, codec.set_cookie(&token))];
    (cookie, Redirect::to("/")).into_response()
}

/// Check the password off the runtime, then record the attempt.
async fn open_session(state: &AppState, form: &LoginForm) -> Result<Session, PortalError> {
    let auth = &state.authenticator;
    let stored_hash = state
        .config
        .read(|cfg| auth.login_hash(&cfg.credentials, form))?;

    let check = match stored_hash {
        Some(stored_hash) => PasswordCheck {
            matched: auth
                .hasher()
                .verify_in_background(form.password.clone(), stored_hash.clone())
                .await,
            stored_hash,
        },
        None => PasswordCheck::unknown_user(),
    };

    let session = state
        .config
        .update(|cfg| auth.finish_login(&mut cfg.credentials, form, &check))??;
    Ok(session)
}

/// `POST /logout`
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    if session.is_authenticated() {
        let auth = &state.authenticator;
        let outcome = state
            .config
            .update(|cfg| auth.logout(&mut cfg.credentials, &session));
        if let Err(e) = outcome {
            return error_page(&state, e.into());
        }
    }
    let clear = state.authenticator.codec().clear_cookie();
    ([(SET_COOKIE, clear)], Redirect::to("/")).into_response()
}

/// `POST /reset-password`
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    if !session.is_authenticated() {
        return login_page(
            &state,
            StatusCode::UNAUTHORIZED,
            Some(Notice::error(AuthError::NotAuthenticated.to_string())),
        );
    }

    let reset_notice = match change_password(&state, &session, &form).await {
        Ok(()) => Notice::success(PASSWORD_MODIFIED),
        Err(PortalError::Auth(e)) if e.is_client_error() => Notice::error(e.to_string()),
        Err(e) => return error_page(&state, e),
    };
    let render = PortalRender {
        reset_notice: Some(reset_notice),
        ..PortalRender::default()
    };
    portal_page(&state, &session, render).await
}

/// Check the current password and hash the new one off the runtime.
async fn change_password(
    state: &AppState,
    session: &Session,
    form: &ResetPasswordForm,
) -> Result<(), PortalError> {
    let auth = &state.authenticator;
    let stored_hash = state
        .config
        .read(|cfg| auth.reset_hash(&cfg.credentials, session, form))?;

    let hasher = *auth.hasher();
    let matched = hasher
        .verify_in_background(form.current_password.clone(), stored_hash.clone())
        .await;
    if !matched {
        let wrong = AuthError::Credentials("Password is incorrect".to_string());
        return Err(wrong.into());
    }
    let new_hash = hasher.hash_in_background(form.new_password.clone()).await?;

    let check = PasswordCheck {
        stored_hash,
        matched,
    };
    state.config.update(|cfg| {
        auth.finish_reset(&mut cfg.credentials, session, &check, new_hash)
    })??;
    Ok(())
}

/// `POST /register`, mounted only when registration is enabled.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match add_user(&state, &form).await {
        Ok(user) => {
            tracing::info!(username = %user.username, email = %user.email, "User registered");
            let notice = Notice::success(USER_REGISTERED);
            login_page(&state, StatusCode::OK, Some(notice))
        }
        Err(e @ PortalError::Auth(AuthError::RegistrationDisabled)) => error_page(&state, e),
        Err(PortalError::Auth(e)) if e.is_client_error() => {
            login_page(&state, StatusCode::OK, Some(Notice::error(e.to_string())))
        }
        Err(e) => error_page(&state, e),
    }
}

/// Validate, hash the password off the runtime, then insert the user.
async fn add_user(state: &AppState, form: &RegisterForm) -> Result<RegisteredUser, PortalError> {
    let auth = &state.authenticator;
    state.config.read(|cfg| {
        auth.check_registration(&cfg.credentials, &pre_authorized_emails(cfg), form)
    })?;

    let password_hash = auth
        .hasher()
        .hash_in_background(form.password.clone())
        .await?;

    let user = state.config.update(|cfg| {
        let mut emails = pre_authorized_emails(cfg);
        let result =
            auth.finish_registration(&mut cfg.credentials, &mut emails, form, password_hash);
        if result.is_ok()
            && let Some(pre) = cfg.pre_authorized.as_mut()
        {
            pre.emails = emails;
        }
        result
    })??;
    Ok(user)
}

fn pre_authorized_emails(cfg: &PortalConfig) -> Vec<String> {
    cfg.pre_authorized
        .as_ref()
        .map(|p| p.emails.clone())
        .unwrap_or_default()
}

//! Account confirmation page.
//!
//! Rendered at `/confirm/{token}`. Calls the account activation endpoint
//! with the token from the URL and reports the outcome to the user.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use serde::{Deserialize, Serialize};

/// Outcome of an activation attempt, as reported to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationOutcome {
    /// The account was activated.
    Activated,
    /// The token was not recognized.
    InvalidToken,
    /// The activation request failed for some other reason.
    Failed,
}

/// Maps an activation response status code to an outcome.
pub fn outcome_for_status(status: u16) -> ActivationOutcome {
    match status {
        404 => ActivationOutcome::InvalidToken,
        200..=299 => ActivationOutcome::Activated,
        _ => ActivationOutcome::Failed,
    }
}

/// Sends the activation request for `token` to the account API.
///
/// Transport failures are reported as [`ActivationOutcome::Failed`] rather
/// than as a server fn error, so the page renders the same message for a
/// failed request and an unreachable API.
#[server]
pub async fn activate_account(token: String) -> Result<ActivationOutcome, ServerFnError> {
    use std::sync::Arc;

    use axum::Extension;

    use crate::config::ServerConfig;

    let Extension(config): Extension<Arc<ServerConfig>> = leptos_axum::extract().await?;

    let client = reqwest::Client::new();
    let url = format!("{}/users/activate/{}", config.api_url, token);
    match client.put(&url).send().await {
        Ok(response) => Ok(outcome_for_status(response.status().as_u16())),
        Err(error) => {
            tracing::warn!(%error, "activation request failed");
            Ok(ActivationOutcome::Failed)
        }
    }
}

/// The confirmation page component.
#[component]
pub fn ConfirmPage() -> impl IntoView {
    let params = use_params_map();
    let token = move || params.read().get("token").unwrap_or_default();

    let activation = Resource::new(token, activate_account);

    view! {
        <div class="confirm-page">
            <Suspense fallback=move || {
                view! { <p>"Loading..."</p> }
            }>
                {move || {
                    activation
                        .get()
                        .map(|result| match result {
                            Ok(ActivationOutcome::Activated) => {
                                view! { <ActivationSuccess /> }.into_any()
                            }
                            Ok(ActivationOutcome::InvalidToken) => {
                                view! { <p>"Invalid token"</p> }.into_any()
                            }
                            Ok(ActivationOutcome::Failed) | Err(_) => {
                                view! {
                                    <p>
                                        "An error occurred! Failed to activate account. Please try again later."
                                    </p>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

/// Success message shown after activation, with a redirect back to the
/// home page.
#[component]
fn ActivationSuccess() -> impl IntoView {
    let navigate = use_navigate();

    Effect::new(move |_| {
        navigate("/", Default::default());
    });

    view! {
        <p>
            "Your account has been activated! You'll be redirected shortly. If not, "
            <a href="/">"click here"</a> "."
        </p>
    }
}

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use mailer::{LogMailer, Mailer, SmtpMailer};
use server_api::{submit_volunteer, ApiContext, Outcome};
use shared::error::{ApiError, ErrorCode};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod views;

use app_state::AppState;
use config::{load_settings, normalize_database_url};
use views::{render, Flash, HomePage, ThankYouPage, VolunteerPage};

const MAX_FORM_BYTES: usize = 64 * 1024;
const MAIL_DEGRADED_NOTICE: &str =
    "Your submission was received, but there was an issue sending confirmation emails.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    let settings = load_settings();
    let organization = settings.organization()?;
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let mailer: Arc<dyn Mailer> = if settings.mail.has_credentials() {
        Arc::new(SmtpMailer::new(&settings.mail)?)
    } else {
        warn!("MAIL_USERNAME/MAIL_PASSWORD not set; outgoing mail will only be logged");
        Arc::new(LogMailer)
    };

    let api = ApiContext {
        store: Arc::new(storage.clone()),
        mailer,
        organization,
    };
    let app = build_router(Arc::new(AppState { api, storage }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/volunteer", get(volunteer_form).post(volunteer_submit))
        .route("/thank-you", get(thank_you))
        .route("/healthz", get(healthz))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

async fn healthz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, (StatusCode, Json<ApiError>)> {
    state.storage.health_check().await.map_err(|e| {
        error!(error = ?e, "health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Unavailable, "database unavailable")),
        )
    })?;
    Ok("ok")
}

async fn home(State(state): State<Arc<AppState>>) -> Response {
    render(
        StatusCode::OK,
        &HomePage {
            organization: state.api.organization.name.clone(),
        },
    )
}

async fn volunteer_form(State(state): State<Arc<AppState>>) -> Response {
    render(StatusCode::OK, &volunteer_page(&state, None))
}

async fn volunteer_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    match submit_volunteer(&state.api, &form).await {
        Ok(Outcome::Success { .. }) => Redirect::to("/thank-you").into_response(),
        Ok(Outcome::PartialSuccess { .. }) => render(
            StatusCode::OK,
            &volunteer_page(&state, Some(Flash::danger(MAIL_DEGRADED_NOTICE))),
        ),
        Err(err) => {
            let api_error = err.to_api_error();
            render(
                status_for(api_error.code),
                &volunteer_page(&state, Some(Flash::danger(api_error.message))),
            )
        }
    }
}

async fn thank_you(State(state): State<Arc<AppState>>) -> Response {
    render(
        StatusCode::OK,
        &ThankYouPage {
            organization: state.api.organization.name.clone(),
        },
    )
}

fn volunteer_page(state: &AppState, flash: Option<Flash>) -> VolunteerPage {
    VolunteerPage {
        organization: state.api.organization.name.clone(),
        flash,
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

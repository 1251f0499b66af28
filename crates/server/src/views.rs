use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

/// One-shot status message shown above the form.
#[derive(Debug, Clone)]
pub(crate) struct Flash {
    pub(crate) level: &'static str,
    pub(crate) message: String,
}

impl Flash {
    pub(crate) fn danger(message: impl Into<String>) -> Self {
        Self {
            level: "danger",
            message: message.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub(crate) struct HomePage {
    pub(crate) organization: String,
}

#[derive(Template)]
#[template(path = "volunteer.html")]
pub(crate) struct VolunteerPage {
    pub(crate) organization: String,
    pub(crate) flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "thank_you.html")]
pub(crate) struct ThankYouPage {
    pub(crate) organization: String,
}

pub(crate) fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(error) => {
            error!(%error, "failed to render page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

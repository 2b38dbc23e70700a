use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

pub const LOGIN_PAGE: &str = "/login";
pub const HOME_PAGE: &str = "/";
pub const EMPLOYEE_LIST_PAGE: &str = "/employees";

/// Browsers get `303 See Other` instead of an error envelope for the
/// failures a user can recover from by navigating elsewhere.
pub async fn redirect_middleware(req: Request, next: Next) -> Response {
    let wants_html = super::accepts_html(req.headers());
    let response = next.run(req).await;
    if !wants_html {
        return response;
    }

    let target = match response.status() {
        StatusCode::UNAUTHORIZED => LOGIN_PAGE.to_string(),
        StatusCode::FORBIDDEN => HOME_PAGE.to_string(),
        StatusCode::NOT_FOUND => EMPLOYEE_LIST_PAGE.to_string(),
        StatusCode::CONFLICT => match response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
        {
            Some(location) => location.to_string(),
            None => return response,
        },
        _ => return response,
    };

    tracing::debug!(status = response.status().as_u16(), %target, "redirecting browser");
    Redirect::to(&target).into_response()
}

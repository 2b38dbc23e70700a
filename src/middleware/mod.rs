mod guards;
mod json_error;
mod panic;
mod redirect;

use axum::http::{HeaderMap, header};

pub use guards::{Authorized, CurrentActor, MaybeSession};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
pub use redirect::{EMPLOYEE_LIST_PAGE, HOME_PAGE, LOGIN_PAGE, redirect_middleware};

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Header carrying the caller's opaque identity (their email)
pub const CUSTOMER_HEADER: &str = "customer";

#[derive(Debug, Clone)]
pub struct Customer {
    pub email: String,
}

/// Require the `customer` header and expose it to handlers as a
/// [`Customer`] extension.
pub async fn customer_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let email = req
        .headers()
        .get(CUSTOMER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::ValidationError(format!("Missing '{}' header", CUSTOMER_HEADER)))?
        .to_string();

    req.extensions_mut().insert(Customer { email });

    Ok(next.run(req).await)
}

//! `x-request-id` handling.
//!
//! The outermost layer settles one id per inbound request. Handlers read it
//! back with [`request_id_of`] and hand it to the batch aggregator, which
//! repeats it on every self-call so a batch and its sub-checks share an id.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::http::{HeaderMap, HeaderValue, Request, Response};
use tower::{Layer, Service};
use uuid::Uuid;

pub use holiday_server::handlers::batch::REQUEST_ID_HEADER;

/// The id settled for the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Returns the non-empty `x-request-id` header value, if any.
pub fn request_id_of(headers: &HeaderMap) -> Option<String> {
    match headers.get(REQUEST_ID_HEADER)?.to_str() {
        Ok(id) if !id.is_empty() => Some(id.to_owned()),
        _ => None,
    }
}

/// Keeps the caller's id or mints a v4 UUID, then echoes it on the response.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let id = request_id_of(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
        // Every minted id is header-safe; a caller's id already came from a header.
        let echoed = HeaderValue::from_str(&id).ok();
        if let Some(value) = &echoed {
            request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
        }
        request.extensions_mut().insert(RequestId(id));

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let mut response = inner.call(request).await?;
            if let Some(value) = echoed {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(response)
        })
    }
}

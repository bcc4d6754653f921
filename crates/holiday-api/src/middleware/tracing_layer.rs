//! Wraps each request in an `http_request` span.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    extract::MatchedPath,
    http::{Request, Response},
};
use tower::{Layer, Service};
use tracing::{field::Empty, info_span, Instrument, Span};

use super::request_id::{request_id_of, RequestId};

/// Opens the `http_request` span.
///
/// The span carries the id settled by [`RequestIdLayer`](super::RequestIdLayer),
/// so handler, lookup and aggregator events within one request share it.
/// Self-calls issued for a batch repeat the id in their own header and get
/// their own span with the same `request_id`.
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TracingService<S>
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

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let route = match request.extensions().get::<MatchedPath>() {
            Some(matched) => matched.as_str().to_owned(),
            None => request.uri().path().to_owned(),
        };
        let request_id = match request.extensions().get::<RequestId>() {
            Some(RequestId(id)) => id.clone(),
            None => request_id_of(request.headers()).unwrap_or_default(),
        };

        let span = info_span!(
            "http_request",
            method = %request.method(),
            route = %route,
            request_id = %request_id,
            http.status_code = Empty,
        );

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let response = inner.call(request).await?;
                Span::current().record("http.status_code", response.status().as_u16());
                Ok(response)
            }
            .instrument(span),
        )
    }
}

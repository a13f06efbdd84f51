/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Middleware answering liveness probes before they reach the wrapped service.
//!
//! # Example
//!
//! ```no_run
//! use broker_server::health_check::HealthCheckLayer;
//! use broker_server::CredentialsService;
//! use broker_auth::StaticJobCredentials;
//! use tower::Layer;
//!
//! // Answer everything under `/health-check/` with `200 Ok`.
//! let app = HealthCheckLayer::default().layer(CredentialsService::new(StaticJobCredentials::new()));
//! ```

use crate::ResponseBody;
use http::{Request, Response, StatusCode};
use pin_project_lite::pin_project;
use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{util::Oneshot, Layer, Service, ServiceExt};

pub const HEALTH_CHECK_PREFIX: &str = "/health-check/";

/// A [`tower::Layer`] used to apply [`HealthCheckService`].
#[derive(Clone, Debug)]
pub struct HealthCheckLayer {
    prefix: Cow<'static, str>,
}

impl HealthCheckLayer {
    /// Answer requests whose path starts with `prefix`.
    pub fn new(prefix: impl Into<Cow<'static, str>>) -> Self {
        HealthCheckLayer { prefix: prefix.into() }
    }
}

impl Default for HealthCheckLayer {
    fn default() -> Self {
        HealthCheckLayer::new(HEALTH_CHECK_PREFIX)
    }
}

impl<S> Layer<S> for HealthCheckLayer {
    type Service = HealthCheckService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HealthCheckService {
            inner,
            layer: self.clone(),
        }
    }
}

/// A middleware [`Service`] responding `200 Ok` to health check requests.
#[derive(Clone, Debug)]
pub struct HealthCheckService<S> {
    inner: S,
    layer: HealthCheckLayer,
}

impl<B, S> Service<Request<B>> for HealthCheckService<S>
where
    S: Service<Request<B>, Response = Response<ResponseBody>> + Clone,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = HealthCheckFuture<S, Request<B>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness of the inner service is checked by `Oneshot`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if req.uri().path().starts_with(self.layer.prefix.as_ref()) {
            HealthCheckFuture::Healthy { done: false }
        } else {
            let clone = self.inner.clone();
            let service = std::mem::replace(&mut self.inner, clone);
            HealthCheckFuture::Inner {
                future: service.oneshot(req),
            }
        }
    }
}

pin_project! {
    /// Future for [`HealthCheckService`].
    #[project = HealthCheckFutureProj]
    pub enum HealthCheckFuture<S: Service<Req>, Req> {
        Healthy { done: bool },
        Inner { #[pin] future: Oneshot<S, Req> },
    }
}

impl<S, Req> Future for HealthCheckFuture<S, Req>
where
    S: Service<Req, Response = Response<ResponseBody>>,
{
    type Output = Result<S::Response, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            HealthCheckFutureProj::Healthy { done } => {
                assert!(!*done, "HealthCheckFuture polled after completion");
                *done = true;
                tracing::trace!("health check");
                let mut response = Response::new(ResponseBody::from("Ok"));
                *response.status_mut() = StatusCode::OK;
                Poll::Ready(Ok(response))
            }
            HealthCheckFutureProj::Inner { future } => future.poll(cx),
        }
    }
}

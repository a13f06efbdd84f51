/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! `GET /credentials/{jobId}`
//!
//! Successful responses use the container credentials layout:
//!
//! ```json
//! {
//!   "RoleArn": "arn:aws:iam::111111111:myrole/role",
//!   "AccessKeyId": "ASIARTESTID",
//!   "SecretAccessKey": "TESTSECRETKEY",
//!   "Token": "TESTSESSIONTOKEN",
//!   "Expiration": "2017-04-11T21:49:00Z"
//! }
//! ```
//!
//! Every failure to provide credentials is a `404` with a plain-text description.

use crate::ResponseBody;
use aws_smithy_types::error::display::DisplayErrorContext;
use broker_auth::{BrokerError, Credentials, JobId, ProvideJobCredentials};
use broker_types::date_time::format_expiration;
use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode, Uri};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

pub const CREDENTIALS_PREFIX: &str = "/credentials/";

/// The request path does not name a job
#[derive(Debug, thiserror::Error)]
#[error("couldn't get job id from request url: {uri}")]
pub struct MalformedRequest {
    uri: String,
}

impl MalformedRequest {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Extracts the job id from `/credentials/{jobId}`
///
/// The id is everything after the prefix, kept percent-encoded. It must not be empty.
pub fn job_id_from_uri(uri: &Uri) -> Result<JobId, MalformedRequest> {
    match uri.path().strip_prefix(CREDENTIALS_PREFIX) {
        Some(job_id) if !job_id.is_empty() => Ok(JobId::from(job_id)),
        _ => Err(MalformedRequest {
            uri: uri.to_string(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error(transparent)]
    Malformed(#[from] MalformedRequest),
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("could not serialize credentials")]
    Serialization(#[source] serde_json::Error),
}

impl RequestError {
    fn status(&self) -> StatusCode {
        match self {
            RequestError::Malformed(_) | RequestError::Broker(_) => StatusCode::NOT_FOUND,
            RequestError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CredentialsBody<'a> {
    role_arn: &'a str,
    access_key_id: &'a str,
    secret_access_key: &'a str,
    #[serde(rename = "Token")]
    session_token: &'a str,
    expiration: String,
}

impl<'a> From<&'a Credentials> for CredentialsBody<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        CredentialsBody {
            role_arn: credentials.role_arn().as_str(),
            access_key_id: credentials.access_key_id(),
            secret_access_key: credentials.secret_access_key(),
            session_token: credentials.session_token(),
            expiration: format_expiration(credentials.expiry()),
        }
    }
}

/// Serves credentials for the job named in the request path
#[derive(Clone, Debug)]
pub struct CredentialsService {
    provider: Arc<dyn ProvideJobCredentials>,
}

impl CredentialsService {
    pub fn new(provider: impl ProvideJobCredentials + 'static) -> Self {
        CredentialsService {
            provider: Arc::new(provider),
        }
    }
}

impl<B> Service<Request<B>> for CredentialsService {
    type Response = Response<ResponseBody>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let provider = self.provider.clone();
        let uri = req.uri().clone();
        Box::pin(async move {
            let response = match handle(provider.as_ref(), &uri).await {
                Ok(body) => {
                    let mut response = Response::new(ResponseBody::from(body));
                    response
                        .headers_mut()
                        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                    response
                }
                Err(err) => {
                    tracing::error!(uri = %uri, error = %DisplayErrorContext(&err), "request failed");
                    error_response(err.status(), err.to_string())
                }
            };
            Ok(response)
        })
    }
}

async fn handle(provider: &dyn ProvideJobCredentials, uri: &Uri) -> Result<Bytes, RequestError> {
    let job_id = job_id_from_uri(uri)?;
    tracing::debug!(job_id = %job_id, "credentials requested");
    let credentials = provider.credentials_for_job(&job_id).await?;
    let body = serde_json::to_vec(&CredentialsBody::from(&credentials)).map_err(RequestError::Serialization)?;
    Ok(Bytes::from(body))
}

fn error_response(status: StatusCode, message: String) -> Response<ResponseBody> {
    let mut response = Response::new(ResponseBody::from(message));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

#[cfg(test)]
mod tests {
    use super::{job_id_from_uri, CredentialsService};
    use broker_auth::StaticJobCredentials;
    use http::{Request, StatusCode, Uri};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn job_id(uri: &str) -> Option<String> {
        job_id_from_uri(&uri.parse::<Uri>().unwrap())
            .ok()
            .map(|id| id.as_str().to_string())
    }

    #[test]
    fn job_id_is_taken_verbatim() {
        assert_eq!(Some("myjob".into()), job_id("/credentials/myjob"));
        assert_eq!(Some("my%20job".into()), job_id("/credentials/my%20job"));
        assert_eq!(Some("team/nightly".into()), job_id("/credentials/team/nightly"));
        assert_eq!(Some("myjob".into()), job_id("/credentials/myjob?verbose=true"));
        assert_eq!(Some("myjob".into()), job_id("http://localhost:8080/credentials/myjob"));
    }

    #[test]
    fn malformed_paths() {
        for uri in ["/credentials", "/credentials/", "/", "/other/myjob", "/credentialsmyjob"] {
            assert_eq!(None, job_id(uri), "{uri}");
        }
        let err = job_id_from_uri(&"/credentials".parse::<Uri>().unwrap()).unwrap_err();
        assert_eq!("/credentials", err.uri());
        assert_eq!("couldn't get job id from request url: /credentials", err.to_string());
    }

    #[tokio::test]
    #[traced_test]
    async fn failures_are_logged_with_the_request() {
        let service = CredentialsService::new(StaticJobCredentials::new());
        let response = service
            .oneshot(Request::get("/credentials/missing").body(()).unwrap())
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert!(logs_contain("request failed"));
        assert!(logs_contain("/credentials/missing"));
        assert!(logs_contain("couldn't find credentials for job: missing"));
    }
}

/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Per-role cache of temporary credentials.
//!
//! [`CredentialCache`] keeps the most recent credentials for each role and only calls the
//! upstream [`AssumeRole`] when the cached entry is missing or close to expiring.
//!
//! Refreshes are single-flight per role: concurrent callers asking for the same stale role share
//! one upstream call and all observe its outcome, success or failure. Callers for different
//! roles never wait on each other.

use crate::provider::{AssumeRole, AssumeRoleError};
use broker_types::{Credentials, RoleArn, SharedTimeSource, TimeSource};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use tracing::Instrument;

pub const DEFAULT_SESSION_DURATION: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_EXPIRY_MARGIN: Duration = Duration::from_secs(10);

/// The upstream could not provide credentials for a role
#[derive(Clone, Debug)]
pub struct UpstreamFailure {
    role_arn: RoleArn,
    cause: Arc<AssumeRoleError>,
}

impl UpstreamFailure {
    fn new(role_arn: RoleArn, cause: AssumeRoleError) -> Self {
        UpstreamFailure {
            role_arn,
            cause: Arc::new(cause),
        }
    }

    pub fn role_arn(&self) -> &RoleArn {
        &self.role_arn
    }

    pub fn cause(&self) -> &Arc<AssumeRoleError> {
        &self.cause
    }

    pub(crate) fn into_parts(self) -> (RoleArn, Arc<AssumeRoleError>) {
        (self.role_arn, self.cause)
    }
}

impl Display for UpstreamFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "failed to assume role {}: {}", self.role_arn, self.cause)
    }
}

impl Error for UpstreamFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref() as _)
    }
}

type RefreshResult = Result<Credentials, UpstreamFailure>;
type RefreshFuture = Shared<BoxFuture<'static, RefreshResult>>;

struct InFlight {
    generation: u64,
    future: RefreshFuture,
}

#[derive(Default)]
struct SlotState {
    cached: Option<Credentials>,
    in_flight: Option<InFlight>,
    generation: u64,
}

/// Cache entry for a single role. The lock is never held across an `.await`.
#[derive(Default)]
struct RoleSlot {
    state: Mutex<SlotState>,
}

impl RoleSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // nothing that can panic runs while the lock is held
        self.state.lock().expect("cannot be poisoned")
    }
}

struct Inner {
    upstream: Arc<dyn AssumeRole>,
    time_source: SharedTimeSource,
    session_duration: Duration,
    expiry_margin: Duration,
    slots: Mutex<HashMap<RoleArn, Arc<RoleSlot>>>,
}

/// Lazily refreshed, per-role credential cache
///
/// A cached entry is handed out while `now + expiry_margin < expiry`. On a miss, the upstream is
/// asked for credentials valid for `session_duration` and the new entry is stored with
/// `expiry = now + session_duration - expiry_margin` (or earlier, if the upstream reports an
/// earlier expiry). Credentials that would already be stale under that rule are rejected with
/// [`AssumeRoleError::ExpiresTooSoon`]. A failed refresh leaves the previous entry untouched.
///
/// `CredentialCache` is cheap to clone; clones share the same entries.
///
/// # Examples
///
/// ```rust
/// use broker_auth::cache::CredentialCache;
/// use broker_auth::provider::StaticAssumeRole;
/// use broker_auth::RoleArn;
/// use std::time::Duration;
///
/// # async fn docs() {
/// let upstream = StaticAssumeRole::new().with_role("arn:aws:iam::111111111:myrole/role", "Key", "Secret", "token");
/// let cache = CredentialCache::builder(upstream)
///     .session_duration(Duration::from_secs(900))
///     .build();
/// let creds = cache
///     .credentials_for(&RoleArn::from("arn:aws:iam::111111111:myrole/role"))
///     .await
///     .unwrap();
/// assert_eq!("Key", creds.access_key_id());
/// # }
/// ```
#[derive(Clone)]
pub struct CredentialCache {
    inner: Arc<Inner>,
}

impl Debug for CredentialCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("upstream", &self.inner.upstream)
            .field("session_duration", &self.inner.session_duration)
            .field("expiry_margin", &self.inner.expiry_margin)
            .finish()
    }
}

impl CredentialCache {
    /// Returns a [`Builder`](builder::Builder) refreshing credentials through `upstream`
    pub fn builder(upstream: impl AssumeRole + 'static) -> builder::Builder {
        builder::Builder::new(upstream)
    }

    /// Returns fresh credentials for `role_arn`, calling the upstream only if needed
    pub async fn credentials_for(&self, role_arn: &RoleArn) -> Result<Credentials, UpstreamFailure> {
        let slot = self.slot(role_arn);
        let (generation, refresh) = {
            let mut guard = slot.lock();
            let state = &mut *guard;
            let now = self.inner.time_source.now();
            let margin = self.inner.expiry_margin;
            if let Some(credentials) = state.cached.as_ref().filter(|c| is_fresh(c.expiry(), margin, now)) {
                tracing::trace!(role_arn = %role_arn, "using cached credentials");
                return Ok(credentials.clone());
            }
            match &state.in_flight {
                Some(in_flight) => {
                    tracing::trace!(role_arn = %role_arn, "joining in-flight refresh");
                    (in_flight.generation, in_flight.future.clone())
                }
                None => {
                    state.generation += 1;
                    let generation = state.generation;
                    let future = self.refresh(role_arn.clone(), now);
                    state.in_flight = Some(InFlight {
                        generation,
                        future: future.clone(),
                    });
                    (generation, future)
                }
            }
        };

        let result = refresh.await;

        let mut state = slot.lock();
        // Every caller of this generation gets here; only the first one updates the slot.
        if state.in_flight.as_ref().map(|f| f.generation) == Some(generation) {
            state.in_flight = None;
            if let Ok(credentials) = &result {
                state.cached = Some(credentials.clone());
            }
        }
        result
    }

    fn slot(&self, role_arn: &RoleArn) -> Arc<RoleSlot> {
        let mut slots = self.inner.slots.lock().expect("cannot be poisoned");
        slots.entry(role_arn.clone()).or_default().clone()
    }

    fn refresh(&self, role_arn: RoleArn, requested_at: SystemTime) -> RefreshFuture {
        let inner = self.inner.clone();
        let span = tracing::debug_span!("refresh_credentials", role_arn = %role_arn);
        async move {
            tracing::debug!(duration = ?inner.session_duration, "assuming role");
            let assumed = inner
                .upstream
                .assume_role(&role_arn, inner.session_duration)
                .await
                .map_err(|err| {
                    tracing::warn!(error = %err, "failed to assume role");
                    UpstreamFailure::new(role_arn.clone(), err)
                })?;
            let expiry = std::cmp::min(requested_at + inner.session_duration, assumed.expiry())
                .checked_sub(inner.expiry_margin)
                .unwrap_or(requested_at);
            if !is_fresh(expiry, inner.expiry_margin, inner.time_source.now()) {
                let err = AssumeRoleError::ExpiresTooSoon {
                    expiry: assumed.expiry(),
                };
                tracing::warn!(error = %err, "failed to assume role");
                return Err(UpstreamFailure::new(role_arn, err));
            }
            tracing::debug!(expiry = %broker_types::date_time::format_expiration(expiry), "credentials refreshed");
            Ok(Credentials::new(
                role_arn,
                assumed.access_key_id(),
                assumed.secret_access_key(),
                assumed.session_token(),
                expiry,
            ))
        }
        .instrument(span)
        .boxed()
        .shared()
    }
}

fn is_fresh(expiry: SystemTime, margin: Duration, now: SystemTime) -> bool {
    now + margin < expiry
}

pub mod builder {
    use super::{CredentialCache, Inner, DEFAULT_EXPIRY_MARGIN, DEFAULT_SESSION_DURATION};
    use crate::provider::AssumeRole;
    use broker_types::{SharedTimeSource, TimeSource};
    use std::sync::Arc;
    use std::time::Duration;

    /// Builder for constructing a [`CredentialCache`].
    pub struct Builder {
        upstream: Arc<dyn AssumeRole>,
        time_source: Option<SharedTimeSource>,
        session_duration: Option<Duration>,
        expiry_margin: Option<Duration>,
    }

    impl Builder {
        pub fn new(upstream: impl AssumeRole + 'static) -> Self {
            Builder {
                upstream: Arc::new(upstream),
                time_source: None,
                session_duration: None,
                expiry_margin: None,
            }
        }

        /// (Optional) Duration requested from the upstream for every refresh.
        /// Defaults to one hour.
        pub fn session_duration(mut self, duration: Duration) -> Self {
            self.session_duration = Some(duration);
            self
        }

        /// (Optional) Safety margin subtracted from the expiry of refreshed credentials and
        /// required on top of the current time for a cached entry to be handed out.
        /// Defaults to 10 seconds.
        pub fn expiry_margin(mut self, margin: Duration) -> Self {
            self.expiry_margin = Some(margin);
            self
        }

        /// (Optional) Clock used for freshness checks. Defaults to the system clock.
        pub fn time_source(mut self, time_source: impl TimeSource + 'static) -> Self {
            self.time_source = Some(SharedTimeSource::new(time_source));
            self
        }

        /// Creates the [`CredentialCache`].
        ///
        /// # Panics
        ///
        /// Panics unless twice the expiry margin is strictly smaller than the session duration.
        /// A refreshed entry expires `session_duration - expiry_margin` after it is fetched and is
        /// only handed out while `expiry_margin` of it remains.
        pub fn build(self) -> CredentialCache {
            let session_duration = self.session_duration.unwrap_or(DEFAULT_SESSION_DURATION);
            let expiry_margin = self.expiry_margin.unwrap_or(DEFAULT_EXPIRY_MARGIN);
            assert!(
                expiry_margin
                    .checked_mul(2)
                    .map_or(false, |twice| twice < session_duration),
                "expiry_margin must be less than half of session_duration"
            );
            CredentialCache {
                inner: Arc::new(Inner {
                    upstream: self.upstream,
                    time_source: self.time_source.unwrap_or_default(),
                    session_duration,
                    expiry_margin,
                    slots: Default::default(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialCache, DEFAULT_EXPIRY_MARGIN, DEFAULT_SESSION_DURATION};
    use crate::future::AssumeRoleFuture;
    use crate::provider::{AssumeRole, AssumeRoleError, AssumedCredentials, StaticAssumeRole};
    use broker_types::time_source::ManualTimeSource;
    use broker_types::{RoleArn, TimeSource};
    use futures_util::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tokio::sync::Semaphore;

    const ROLE: &str = "arn:aws:iam::111111111:myrole/role";

    fn epoch_secs(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn test_cache(time: &ManualTimeSource, upstream: impl AssumeRole + 'static) -> CredentialCache {
        CredentialCache::builder(upstream)
            .time_source(time.clone())
            .build()
    }

    /// Upstream that blocks every call until a permit is released, then answers from a list
    #[derive(Debug)]
    struct GatedUpstream {
        gate: Semaphore,
        calls: AtomicUsize,
        responses: Mutex<Vec<Result<String, String>>>,
        time: ManualTimeSource,
    }

    impl GatedUpstream {
        fn new(time: &ManualTimeSource, responses: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(GatedUpstream {
                gate: Semaphore::new(0),
                calls: AtomicUsize::new(0),
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_owned).map_err(str::to_owned))
                        .collect(),
                ),
                time: time.clone(),
            })
        }

        fn open(&self, permits: usize) {
            self.gate.add_permits(permits);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AssumeRole for GatedUpstream {
        fn assume_role<'a>(&'a self, _role_arn: &'a RoleArn, duration: Duration) -> AssumeRoleFuture<'a> {
            AssumeRoleFuture::new(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.gate.acquire().await.expect("never closed").forget();
                let response = self.responses.lock().unwrap().remove(0);
                match response {
                    Ok(key) => Ok(AssumedCredentials::new(key, "secret", "token", self.time.now() + duration)),
                    Err(message) => Err(AssumeRoleError::ServiceError(message.into())),
                }
            })
        }
    }

    #[tokio::test]
    async fn initial_populate_credentials() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = StaticAssumeRole::new().with_role(ROLE, "Key", "Secret", "token");
        let cache = test_cache(&time, upstream.clone());

        let creds = cache.credentials_for(&RoleArn::from(ROLE)).await.unwrap();
        assert_eq!(ROLE, creds.role_arn().as_str());
        assert_eq!("Key", creds.access_key_id());
        assert_eq!("Secret", creds.secret_access_key());
        assert_eq!("token", creds.session_token());
        assert_eq!(
            epoch_secs(100) + DEFAULT_SESSION_DURATION - DEFAULT_EXPIRY_MARGIN,
            creds.expiry()
        );
        assert!(creds.expiry() > time.now() + DEFAULT_EXPIRY_MARGIN);
        assert_eq!(1, upstream.calls());
    }

    #[tokio::test]
    async fn cached_credentials_are_reused() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = StaticAssumeRole::new().with_role(ROLE, "Key", "Secret", "token");
        let cache = test_cache(&time, upstream.clone());

        let first = cache.credentials_for(&RoleArn::from(ROLE)).await.unwrap();
        time.advance(Duration::from_secs(1800));
        let second = cache.credentials_for(&RoleArn::from(ROLE)).await.unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(1, upstream.calls());
    }

    #[tokio::test]
    async fn refresh_expired_credentials() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = StaticAssumeRole::new().with_role(ROLE, "Key", "Secret", "token");
        let cache = test_cache(&time, upstream.clone());
        let role = RoleArn::from(ROLE);

        let first = cache.credentials_for(&role).await.unwrap();
        // expiry is 100 + 3600 - 10; an entry is stale once now + 10 >= expiry
        time.set_time(epoch_secs(100 + 3600 - 20 - 1));
        assert!(cache.credentials_for(&role).await.unwrap().ptr_eq(&first));
        assert_eq!(1, upstream.calls());

        time.set_time(epoch_secs(100 + 3600 - 20));
        let second = cache.credentials_for(&role).await.unwrap();
        assert_eq!(2, upstream.calls());
        assert!(second.expiry() > first.expiry());
        assert_eq!(epoch_secs(100 + 3600 - 20) + Duration::from_secs(3600 - 10), second.expiry());

        assert!(cache.credentials_for(&role).await.unwrap().ptr_eq(&second));
        assert_eq!(2, upstream.calls());
    }

    #[tokio::test]
    async fn roles_are_cached_independently() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = StaticAssumeRole::new()
            .with_role("role-a", "KeyA", "SecretA", "tokenA")
            .with_role("role-b", "KeyB", "SecretB", "tokenB");
        let cache = test_cache(&time, upstream.clone());

        let a = cache.credentials_for(&RoleArn::from("role-a")).await.unwrap();
        let b = cache.credentials_for(&RoleArn::from("role-b")).await.unwrap();
        assert_eq!("KeyA", a.access_key_id());
        assert_eq!("KeyB", b.access_key_id());
        assert_eq!(2, upstream.calls());

        cache.credentials_for(&RoleArn::from("role-a")).await.unwrap();
        cache.credentials_for(&RoleArn::from("role-b")).await.unwrap();
        assert_eq!(2, upstream.calls());
    }

    #[tokio::test]
    async fn refresh_failed_error() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = StaticAssumeRole::new();
        let cache = test_cache(&time, upstream.clone());

        let err = cache
            .credentials_for(&RoleArn::from(ROLE))
            .await
            .expect_err("role is unknown upstream");
        assert_eq!(ROLE, err.role_arn().as_str());
        assert!(matches!(err.cause().as_ref(), AssumeRoleError::ServiceError(_)));

        // failures are not cached
        assert!(cache.credentials_for(&RoleArn::from(ROLE)).await.is_err());
        assert_eq!(2, upstream.calls());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_entry() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = GatedUpstream::new(&time, vec![Ok("first"), Err("throttled"), Ok("third")]);
        upstream.open(3);
        let cache = test_cache(&time, upstream.clone());
        let role = RoleArn::from(ROLE);

        let first = cache.credentials_for(&role).await.unwrap();
        time.advance(Duration::from_secs(3600));
        let err = cache.credentials_for(&role).await.expect_err("upstream throttled");
        assert!(err.to_string().contains("throttled"));
        assert!(cache.inner.slots.lock().unwrap()[&role]
            .lock()
            .cached
            .as_ref()
            .unwrap()
            .ptr_eq(&first));

        let third = cache.credentials_for(&role).await.unwrap();
        assert_eq!("third", third.access_key_id());
        assert_eq!(3, upstream.calls());
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = GatedUpstream::new(&time, vec![Ok("shared")]);
        let cache = test_cache(&time, upstream.clone());
        let role = RoleArn::from(ROLE);

        let callers = join_all((0..16).map(|_| cache.credentials_for(&role)));
        let release = async {
            while upstream.calls() == 0 {
                tokio::task::yield_now().await;
            }
            upstream.open(1);
        };
        let (results, ()) = futures_util::future::join(callers, release).await;

        assert_eq!(1, upstream.calls());
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(result.as_ref().unwrap().ptr_eq(first));
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_failure() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = GatedUpstream::new(&time, vec![Err("AccessDenied"), Ok("later")]);
        let cache = test_cache(&time, upstream.clone());
        let role = RoleArn::from(ROLE);

        let callers = join_all((0..8).map(|_| cache.credentials_for(&role)));
        let release = async {
            while upstream.calls() == 0 {
                tokio::task::yield_now().await;
            }
            upstream.open(1);
        };
        let (results, ()) = futures_util::future::join(callers, release).await;

        assert_eq!(1, upstream.calls());
        let first = results[0].as_ref().unwrap_err();
        for result in &results {
            let err = result.as_ref().unwrap_err();
            assert!(Arc::ptr_eq(err.cause(), first.cause()));
        }

        // the failed refresh is not reused
        upstream.open(1);
        assert_eq!("later", cache.credentials_for(&role).await.unwrap().access_key_id());
        assert_eq!(2, upstream.calls());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn distinct_roles_do_not_block_each_other() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let slow = GatedUpstream::new(&time, vec![Ok("slow")]);

        #[derive(Debug)]
        struct Router {
            slow: Arc<GatedUpstream>,
            fast: StaticAssumeRole,
        }
        impl AssumeRole for Router {
            fn assume_role<'a>(&'a self, role_arn: &'a RoleArn, duration: Duration) -> AssumeRoleFuture<'a> {
                if role_arn.as_str() == "slow" {
                    self.slow.assume_role(role_arn, duration)
                } else {
                    self.fast.assume_role(role_arn, duration)
                }
            }
        }

        let cache = test_cache(
            &time,
            Router {
                slow: slow.clone(),
                fast: StaticAssumeRole::new().with_role("fast", "Key", "Secret", "token"),
            },
        );

        let blocked = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.credentials_for(&RoleArn::from("slow")).await })
        };
        while slow.calls() == 0 {
            tokio::task::yield_now().await;
        }

        let fast = tokio::time::timeout(
            Duration::from_secs(5),
            cache.credentials_for(&RoleArn::from("fast")),
        )
        .await
        .expect("fast role must not wait for the slow one")
        .unwrap();
        assert_eq!("Key", fast.access_key_id());
        assert!(!blocked.is_finished());

        slow.open(1);
        assert_eq!("slow", blocked.await.unwrap().unwrap().access_key_id());
    }

    #[tokio::test]
    async fn upstream_expiry_caps_cached_expiry() {
        let time = ManualTimeSource::new(epoch_secs(100));

        #[derive(Debug)]
        struct ShortLived;
        impl AssumeRole for ShortLived {
            fn assume_role<'a>(&'a self, _: &'a RoleArn, _: Duration) -> AssumeRoleFuture<'a> {
                AssumeRoleFuture::ready(Ok(AssumedCredentials::new("a", "b", "c", epoch_secs(100 + 900))))
            }
        }

        let cache = test_cache(&time, ShortLived);
        let creds = cache.credentials_for(&RoleArn::from(ROLE)).await.unwrap();
        assert_eq!(epoch_secs(100 + 900 - 10), creds.expiry());
    }

    #[tokio::test]
    async fn credentials_expiring_within_margin_are_rejected() {
        let time = ManualTimeSource::new(epoch_secs(100));

        #[derive(Debug, Default)]
        struct AlmostExpired {
            calls: AtomicUsize,
        }
        impl AssumeRole for AlmostExpired {
            fn assume_role<'a>(&'a self, _: &'a RoleArn, _: Duration) -> AssumeRoleFuture<'a> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                AssumeRoleFuture::ready(Ok(AssumedCredentials::new("a", "b", "c", epoch_secs(100 + 5))))
            }
        }

        let upstream = Arc::new(AlmostExpired::default());
        let cache = test_cache(&time, upstream.clone());
        let role = RoleArn::from(ROLE);

        let err = cache.credentials_for(&role).await.expect_err("expires within the margin");
        assert_eq!(ROLE, err.role_arn().as_str());
        assert!(matches!(
            err.cause().as_ref(),
            AssumeRoleError::ExpiresTooSoon { expiry } if *expiry == epoch_secs(105)
        ));
        assert!(err.to_string().contains("expire too soon"), "{err}");

        // nothing was cached
        assert!(cache.credentials_for(&role).await.is_err());
        assert_eq!(2, upstream.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn fresh_credentials_are_cached_with_largest_margin() {
        let time = ManualTimeSource::new(epoch_secs(100));
        let upstream = StaticAssumeRole::new()
            .with_role(ROLE, "Key", "Secret", "token")
            .with_time_source(time.clone());
        let cache = CredentialCache::builder(upstream.clone())
            .session_duration(Duration::from_secs(3600))
            .expiry_margin(Duration::from_secs(1799))
            .time_source(time.clone())
            .build();
        let role = RoleArn::from(ROLE);

        let first = cache.credentials_for(&role).await.unwrap();
        assert!(time.now() + Duration::from_secs(1799) < first.expiry());
        assert!(cache.credentials_for(&role).await.unwrap().ptr_eq(&first));
        assert_eq!(1, upstream.calls());
    }

    #[test]
    #[should_panic(expected = "expiry_margin must be less than half of session_duration")]
    fn margin_must_fit_in_duration() {
        CredentialCache::builder(StaticAssumeRole::new())
            .session_duration(Duration::from_secs(10))
            .expiry_margin(Duration::from_secs(10))
            .build();
    }

    #[test]
    #[should_panic(expected = "expiry_margin must be less than half of session_duration")]
    fn margin_of_half_the_duration_is_rejected() {
        CredentialCache::builder(StaticAssumeRole::new())
            .session_duration(Duration::from_secs(3600))
            .expiry_margin(Duration::from_secs(1800))
            .build();
    }
}

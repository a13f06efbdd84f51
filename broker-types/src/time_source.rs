/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Time source abstraction to support testing
use std::fmt::Debug;
use std::sync::Arc;
use std::time::SystemTime;

/// Trait with a `now()` function returning the current time
pub trait TimeSource: Debug + Send + Sync {
    /// Returns the current time
    fn now(&self) -> SystemTime;
}

/// Timesource delegating to SystemTime::now()
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    /// Creates a new SystemTimeSource
    pub fn new() -> Self {
        SystemTimeSource
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Cheaply cloneable [`TimeSource`]
#[derive(Clone, Debug)]
pub struct SharedTimeSource(Arc<dyn TimeSource>);

impl SharedTimeSource {
    pub fn new(source: impl TimeSource + 'static) -> Self {
        SharedTimeSource(Arc::new(source))
    }
}

impl Default for SharedTimeSource {
    fn default() -> Self {
        SharedTimeSource::new(SystemTimeSource)
    }
}

impl TimeSource for SharedTimeSource {
    fn now(&self) -> SystemTime {
        self.0.now()
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use manual::ManualTimeSource;

#[cfg(any(test, feature = "test-util"))]
mod manual {
    use super::TimeSource;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, SystemTime};

    /// Time source that only moves when told to
    ///
    /// Clones share the same clock, so a test can keep one handle and give another to the
    /// component under test.
    #[derive(Clone, Debug)]
    pub struct ManualTimeSource {
        now: Arc<Mutex<SystemTime>>,
    }

    impl ManualTimeSource {
        pub fn new(start_time: SystemTime) -> Self {
            Self {
                now: Arc::new(Mutex::new(start_time)),
            }
        }

        pub fn set_time(&self, time: SystemTime) {
            *self.now.lock().unwrap() = time;
        }

        pub fn advance(&self, delta: Duration) {
            *self.now.lock().unwrap() += delta;
        }
    }

    impl TimeSource for ManualTimeSource {
        fn now(&self) -> SystemTime {
            *self.now.lock().unwrap()
        }
    }
}

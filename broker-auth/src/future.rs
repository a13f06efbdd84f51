/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Boxed futures returned by the provider traits.

use crate::broker::BrokerError;
use crate::provider::{AssumeRoleError, AssumedCredentials};
use broker_types::Credentials;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

macro_rules! boxed_future {
    ($(#[$docs:meta])* $name:ident => $output:ty) => {
        $(#[$docs])*
        pub struct $name<'a>(BoxFuture<'a, $output>);

        impl<'a> $name<'a> {
            pub fn new(future: impl Future<Output = $output> + Send + 'a) -> Self {
                $name(Box::pin(future))
            }

            pub fn ready(output: $output) -> Self {
                $name(Box::pin(std::future::ready(output)))
            }
        }

        impl Future for $name<'_> {
            type Output = $output;

            fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
                self.0.as_mut().poll(cx)
            }
        }
    };
}

boxed_future!(
    /// Future returned by [`AssumeRole::assume_role`](crate::provider::AssumeRole::assume_role)
    AssumeRoleFuture => Result<AssumedCredentials, AssumeRoleError>
);

boxed_future!(
    /// Future returned by
    /// [`ProvideJobCredentials::credentials_for_job`](crate::broker::ProvideJobCredentials::credentials_for_job)
    JobCredentialsFuture => Result<Credentials, BrokerError>
);

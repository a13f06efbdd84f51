/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Types shared by every layer of the credential broker.
//!
//! A job is identified by a [`JobId`]. The broker maps it to a [`RoleArn`] and hands back
//! [`Credentials`], a temporary credential set scoped to that role.

pub mod credentials;
pub mod date_time;
pub mod identifier;
pub mod time_source;

pub use credentials::Credentials;
pub use identifier::{JobId, RoleArn};
pub use time_source::{SharedTimeSource, SystemTimeSource, TimeSource};

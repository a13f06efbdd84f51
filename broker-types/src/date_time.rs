/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Wire formatting for credential expiration timestamps.

use std::time::SystemTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// `YYYY-MM-DDTHH:MM:SSZ`: second precision, always UTC.
const EXPIRATION_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Formats `expiry` the way credential consumers expect the `Expiration` field.
///
/// Sub-second precision is truncated.
pub fn format_expiration(expiry: SystemTime) -> String {
    let date_time = OffsetDateTime::from(expiry);
    // formatting only fails for years outside 0..=9999
    date_time
        .format(EXPIRATION_FORMAT)
        .unwrap_or_else(|_| date_time.to_string())
}

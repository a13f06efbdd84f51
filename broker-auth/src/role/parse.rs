/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Parser for section keyed mapping files
//!
//! ```ini
//! ; comments start with `;` or `#`
//! [roles]
//! myjob = arn:aws:iam::111111111:myrole/role
//! ```
//!
//! Keys and values are trimmed. Values may be wrapped in double quotes. A repeated key within a
//! section keeps the last value.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Section name => (key => value)
pub(super) type RawSections<'a> = HashMap<&'a str, HashMap<&'a str, &'a str>>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseError {
    line_number: usize,
    message: String,
}

impl ParseError {
    fn new(line_number: usize, message: impl Into<String>) -> Self {
        ParseError {
            line_number,
            message: message.into(),
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing line {}: {}", self.line_number, self.message)
    }
}

impl Error for ParseError {}

fn is_comment(line: &str) -> bool {
    line.starts_with(';') || line.starts_with('#')
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(value)
}

pub(super) fn parse(contents: &str) -> Result<RawSections<'_>, ParseError> {
    let mut sections = RawSections::new();
    let mut current: Option<&str> = None;
    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| ParseError::new(line_number, "section header is not terminated with `]`"))?
                .trim();
            if name.is_empty() {
                return Err(ParseError::new(line_number, "section name must not be empty"));
            }
            sections.entry(name).or_default();
            current = Some(name);
            continue;
        }
        let section = current.ok_or_else(|| {
            ParseError::new(line_number, "expected a section header before the first property")
        })?;
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ParseError::new(line_number, "expected a property of the form `key = value`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::new(line_number, "property key must not be empty"));
        }
        if let Some(previous) = sections
            .entry(section)
            .or_default()
            .insert(key, unquote(value.trim()))
        {
            tracing::debug!(section = %section, key = %key, previous = %previous, "duplicate key, keeping the last value");
        }
    }
    Ok(sections)
}

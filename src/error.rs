// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no user id available for this session")]
    MissingUser,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend answered {code}: {body}")]
    Status { code: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("local store: {0}")]
    Store(#[from] rusqlite::Error),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::Invalid(msg.into())
    }
}

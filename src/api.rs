// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! REST backend access.
//!
//! [`Backend`] is what the controller talks to; [`HttpBackend`] implements it
//! over blocking `reqwest` against the `/api/*` endpoints.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{Config, RouteStyle};
use crate::error::{Error, Result};
use crate::models::{Category, NewRecord, Period, Record, RecordUpdate, Report, UserProfile};
use crate::utils::http_client;

pub trait Backend {
    /// `Ok(None)` when the backend has no profile for `user_id`.
    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;
    fn init_user(&self, profile: &UserProfile) -> Result<()>;
    fn categories(&self) -> Result<Vec<Category>>;
    fn report(&self, user_id: &str, period: Period) -> Result<Report>;
    fn records(&self, user_id: &str) -> Result<Vec<Record>>;
    fn add_record(&self, user_id: &str, record: &NewRecord) -> Result<()>;
    fn update_record(&self, user_id: &str, id: i64, patch: &RecordUpdate) -> Result<()>;
}

#[derive(Serialize)]
struct WithUser<'a, T: Serialize> {
    #[serde(flatten)]
    inner: &'a T,
    user_id: &'a str,
}

// Some deployments wrap the list in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordList {
    Bare(Vec<Record>),
    Records { records: Vec<Record> },
    Operations { operations: Vec<Record> },
}

impl RecordList {
    fn into_vec(self) -> Vec<Record> {
        match self {
            RecordList::Bare(v) => v,
            RecordList::Records { records } => records,
            RecordList::Operations { operations } => operations,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    routes: RouteStyle,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            routes: config.routes,
            client: http_client(config.timeout_secs)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn list_path(&self) -> &'static str {
        match self.routes {
            RouteStyle::Records => "/api/records",
            RouteStyle::Operations => "/api/operations",
        }
    }

    fn update_path(&self, id: i64) -> String {
        match self.routes {
            RouteStyle::Records => format!("/api/update/{}", id),
            RouteStyle::Operations => format!("/api/operations/{}", id),
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let text = resp.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for HttpBackend {
    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        log::debug!("GET /api/get_user user_id={}", user_id);
        let req = self
            .client
            .get(self.url("/api/get_user"))
            .query(&[("user_id", user_id)]);
        let resp = match self.send(req) {
            Ok(r) => r,
            Err(Error::Status { code, .. }) if code == StatusCode::NOT_FOUND.as_u16() => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let val: serde_json::Value = Self::decode(resp)?;
        if val.is_null() || val.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(val)?))
    }

    fn init_user(&self, profile: &UserProfile) -> Result<()> {
        log::debug!("POST /api/init_user user_id={}", profile.user_id);
        self.send(self.client.post(self.url("/api/init_user")).json(profile))?;
        Ok(())
    }

    fn categories(&self) -> Result<Vec<Category>> {
        log::debug!("GET /api/categories");
        let resp = self.send(self.client.get(self.url("/api/categories")))?;
        Self::decode(resp)
    }

    fn report(&self, user_id: &str, period: Period) -> Result<Report> {
        log::debug!("GET /api/report period={} user_id={}", period, user_id);
        let req = self
            .client
            .get(self.url("/api/report"))
            .query(&[("period", period.as_str()), ("user_id", user_id)]);
        Self::decode(self.send(req)?)
    }

    fn records(&self, user_id: &str) -> Result<Vec<Record>> {
        let path = self.list_path();
        log::debug!("GET {} user_id={}", path, user_id);
        let req = self
            .client
            .get(self.url(path))
            .query(&[("user_id", user_id)]);
        let list: RecordList = Self::decode(self.send(req)?)?;
        Ok(list.into_vec())
    }

    fn add_record(&self, user_id: &str, record: &NewRecord) -> Result<()> {
        log::debug!("POST /api/add {} {}", record.r#type, record.amount);
        let body = WithUser {
            inner: record,
            user_id,
        };
        self.send(self.client.post(self.url("/api/add")).json(&body))?;
        Ok(())
    }

    fn update_record(&self, user_id: &str, id: i64, patch: &RecordUpdate) -> Result<()> {
        let path = self.update_path(id);
        log::debug!("PUT {}", path);
        let body = WithUser {
            inner: patch,
            user_id,
        };
        self.send(self.client.put(self.url(&path)).json(&body))?;
        Ok(())
    }
}

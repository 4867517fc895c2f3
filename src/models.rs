// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Income,
    Expense,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Income => "income",
            RecordType::Expense => "expense",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(RecordType::Income),
            "expense" => Ok(RecordType::Expense),
            other => Err(Error::invalid(format!(
                "Invalid record type '{}', expected income or expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub r#type: RecordType,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "de_string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub start_balance: Option<Decimal>,
}

/// Aggregated figures for one period, computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub period_label: String,
    #[serde(default, deserialize_with = "de_decimal_or_zero")]
    pub income: Decimal,
    #[serde(default, deserialize_with = "de_decimal_or_zero")]
    pub expense: Decimal,
    #[serde(default)]
    pub start_balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Report {
    /// start_balance + income - expense. `fallback_start` is used when the
    /// report itself carries no start balance.
    pub fn balance(&self, fallback_start: Option<Decimal>) -> Decimal {
        let start = self
            .start_balance
            .or(fallback_start)
            .unwrap_or(Decimal::ZERO);
        start + self.income - self.expense
    }
}

/// Body of a record creation request, minus the user id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord {
    pub r#type: RecordType,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update: only fields that are `Some` go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<RecordType>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.r#type.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
    }

    /// Drops fields that already match `rec`.
    pub fn diff_against(mut self, rec: &Record) -> Self {
        if self.r#type == Some(rec.r#type) {
            self.r#type = None;
        }
        if self.amount == Some(rec.amount) {
            self.amount = None;
        }
        if self.currency.as_deref() == Some(rec.currency.as_str()) {
            self.currency = None;
        }
        if self.category_id.is_some() && self.category_id == rec.category_id {
            self.category_id = None;
        }
        if self.description.is_some() && self.description == rec.description {
            self.description = None;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Day, Period::Week, Period::Month, Period::Year];

    /// Value sent as the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "Day",
            Period::Week => "Week",
            Period::Month => "Month",
            Period::Year => "Year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid(format!(
                    "Invalid period '{}', expected day, week, month or year",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    Records,
    Reports,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Records, Tab::Reports, Tab::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Records => "records",
            Tab::Reports => "reports",
            Tab::Settings => "settings",
        }
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid(format!("Unknown tab '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Loading,
    Unauthenticated,
    FirstVisit,
    MainView,
}

fn de_timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match serde_json::Value::deserialize(d)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => crate::utils::parse_timestamp(&s)
            .map(Some)
            .map_err(D::Error::custom),
        serde_json::Value::Number(n) => epoch_timestamp(&n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("timestamp {} out of range", n))),
        other => Err(D::Error::custom(format!(
            "expected timestamp string or epoch number, got {}",
            other
        ))),
    }
}

// Epoch values above this are taken as milliseconds (year 5138 in seconds).
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

fn epoch_timestamp(n: &serde_json::Number) -> Option<DateTime<Utc>> {
    if let Some(v) = n.as_i64() {
        return if v.abs() >= EPOCH_MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(v)
        } else {
            DateTime::from_timestamp(v, 0)
        };
    }
    let f = n.as_f64()?;
    if !f.is_finite() {
        return None;
    }
    let millis = if f.abs() >= EPOCH_MILLIS_THRESHOLD as f64 { f } else { f * 1000.0 };
    DateTime::from_timestamp_millis(millis.round() as i64)
}

fn de_decimal_or_zero<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(d)?.unwrap_or(Decimal::ZERO))
}

fn de_string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! View state for the finance client and its synchronization with the backend.
//!
//! The controller owns everything a screen needs (balance, currency, report,
//! records, categories, editor, tab) and a single pending alert. Every failed
//! operation leaves the state it touched as it was and raises that alert.

use rust_decimal::Decimal;

use crate::api::Backend;
use crate::error::{Error, Result};
use crate::models::{
    Category, NewRecord, Period, Phase, Record, RecordType, RecordUpdate, Report, Tab,
    UserProfile,
};
use crate::store::Store;

pub const ALERT_UNAUTHENTICATED: &str =
    "Open this app through the host application (no user id configured)";
pub const ALERT_PROFILE: &str = "Failed to load profile";
pub const ALERT_CATEGORIES: &str = "Failed to load categories";
pub const ALERT_RECORDS: &str = "Failed to load records";
pub const ALERT_REPORT: &str = "Failed to load report";
pub const ALERT_ADD: &str = "Failed to add record";
pub const ALERT_UPDATE: &str = "Failed to update record";
pub const ALERT_INIT: &str = "Failed to save profile";
pub const ALERT_NOT_FOUND: &str = "Record not found";

/// An open record editor: the cached record and the pending changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub record: Record,
    pub draft: RecordUpdate,
}

pub struct Controller<B: Backend> {
    backend: B,
    store: Store,
    user_id: Option<String>,
    phase: Phase,
    tab: Tab,
    loading: bool,
    profile: Option<UserProfile>,
    balance: Option<Decimal>,
    currency: String,
    report: Option<Report>,
    report_period: Option<Period>,
    records: Vec<Record>,
    categories: Vec<Category>,
    editor: Option<Editor>,
    alert: Option<String>,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, store: Store, user_id: Option<String>, currency: &str) -> Self {
        Self {
            backend,
            store,
            user_id,
            phase: Phase::Loading,
            tab: Tab::default(),
            loading: false,
            profile: None,
            balance: None,
            currency: currency.to_string(),
            report: None,
            report_period: None,
            records: Vec::new(),
            categories: Vec::new(),
            editor: None,
            alert: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
    pub fn store(&self) -> &Store {
        &self.store
    }
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_first_visit(&self) -> bool {
        self.phase == Phase::FirstVisit
    }
    pub fn is_loading(&self) -> bool {
        self.loading
    }
    pub fn tab(&self) -> Tab {
        self.tab
    }
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }
    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }
    pub fn currency(&self) -> &str {
        &self.currency
    }
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }
    pub fn report_period(&self) -> Option<Period> {
        self.report_period
    }
    pub fn records(&self) -> &[Record] {
        &self.records
    }
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }
    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.editor.as_mut()
    }
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Pops the pending alert.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // First unseen alert stays on screen; later ones only go to the log.
    fn raise(&mut self, msg: &str) {
        if self.alert.is_none() {
            self.alert = Some(msg.to_string());
        } else {
            log::warn!("suppressed alert: {}", msg);
        }
    }

    fn require_user(&mut self) -> Result<String> {
        match self.user_id.clone() {
            Some(uid) => Ok(uid),
            None => {
                self.raise(ALERT_UNAUTHENTICATED);
                Err(Error::MissingUser)
            }
        }
    }

    fn stored<T>(&self, what: &str, r: Result<Option<T>>) -> Option<T> {
        r.unwrap_or_else(|e| {
            log::warn!("could not read stored {}: {}", what, e);
            None
        })
    }

    /// Start balance from the profile, else from this user's local store.
    pub fn start_balance(&self) -> Option<Decimal> {
        self.profile
            .as_ref()
            .and_then(|p| p.start_balance)
            .or_else(|| {
                let uid = self.user_id.as_deref()?;
                self.stored("start balance", self.store.start_balance(uid))
            })
    }

    /// Initial load: profile first, then categories, yearly report and records.
    pub fn mount(&mut self) {
        self.phase = Phase::Loading;
        self.loading = true;
        self.load();
        self.loading = false;
        log::info!("mounted in phase {:?}", self.phase);
    }

    fn load(&mut self) {
        let Some(uid) = self.user_id.clone() else {
            self.balance = None;
            self.phase = Phase::Unauthenticated;
            self.raise(ALERT_UNAUTHENTICATED);
            return;
        };

        // Only a definitive "no profile" answer leads to first visit.
        let profile_known = match self.backend.get_user(&uid) {
            Ok(profile) => {
                self.profile = profile;
                true
            }
            Err(e) => {
                log::warn!("profile fetch failed, using local fallback: {}", e);
                self.raise(ALERT_PROFILE);
                self.balance = self.stored("balance", self.store.balance(&uid));
                false
            }
        };

        if profile_known && self.start_balance().is_none() {
            self.phase = Phase::FirstVisit;
            return;
        }

        let profile_currency = self
            .profile
            .as_ref()
            .map(|p| p.currency.clone())
            .filter(|c| !c.is_empty());
        if let Some(ccy) =
            profile_currency.or_else(|| self.stored("currency", self.store.currency(&uid)))
        {
            self.currency = ccy;
        }

        self.load_main(&uid);
    }

    fn load_main(&mut self, uid: &str) {
        match self.backend.categories() {
            Ok(cats) => self.categories = cats,
            Err(e) => {
                log::warn!("categories fetch failed: {}", e);
                self.raise(ALERT_CATEGORIES);
            }
        }

        match self.backend.report(uid, Period::Year) {
            Ok(report) => {
                self.set_balance_from(&report);
                self.report = Some(report);
                self.report_period = Some(Period::Year);
            }
            Err(e) => {
                log::warn!("yearly report fetch failed: {}", e);
                self.raise(ALERT_REPORT);
            }
        }

        match self.backend.records(uid) {
            Ok(records) => self.records = records,
            Err(e) => {
                log::warn!("records fetch failed: {}", e);
                self.raise(ALERT_RECORDS);
            }
        }

        self.phase = Phase::MainView;
    }

    fn set_balance_from(&mut self, report: &Report) {
        let balance = report.balance(self.start_balance());
        self.balance = Some(balance);
        let Some(uid) = self.user_id.as_deref() else {
            return;
        };
        if let Err(e) = self.store.save_last_known(uid, balance, &self.currency) {
            log::warn!("could not persist last-known balance: {}", e);
        }
    }

    /// Re-derives the balance from the yearly report. Failures are logged only.
    pub fn refresh_balance(&mut self) {
        let Some(uid) = self.user_id.clone() else {
            return;
        };
        match self.backend.report(&uid, Period::Year) {
            Ok(report) => {
                self.set_balance_from(&report);
                if self.report_period == Some(Period::Year) {
                    self.report = Some(report);
                }
            }
            Err(e) => log::warn!("balance refresh failed: {}", e),
        }
    }

    fn refresh_records(&mut self, uid: &str) {
        match self.backend.records(uid) {
            Ok(records) => self.records = records,
            Err(e) => log::warn!("records refresh failed: {}", e),
        }
    }

    fn refresh_after_write(&mut self, uid: &str) {
        self.refresh_balance();
        self.refresh_records(uid);
    }

    pub fn add_record(
        &mut self,
        r#type: RecordType,
        amount: Decimal,
        currency: &str,
        category_id: Option<i64>,
        description: Option<&str>,
    ) -> Result<()> {
        let uid = self.require_user()?;
        if amount <= Decimal::ZERO {
            self.raise("Amount must be greater than zero");
            return Err(Error::invalid(format!("Invalid amount {}", amount)));
        }
        let record = NewRecord {
            r#type,
            amount,
            currency: currency.to_string(),
            category_id,
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };
        if let Err(e) = self.backend.add_record(&uid, &record) {
            log::warn!("add record failed: {}", e);
            self.raise(ALERT_ADD);
            return Err(e);
        }
        log::info!("added {} {} {}", r#type, amount, currency);
        self.refresh_after_write(&uid);
        Ok(())
    }

    pub fn update_record(&mut self, id: i64, fields: RecordUpdate) -> Result<()> {
        let uid = self.require_user()?;
        if fields.is_empty() {
            self.raise("Nothing to update");
            return Err(Error::invalid("Empty update"));
        }
        if fields.amount.is_some_and(|a| a <= Decimal::ZERO) {
            self.raise("Amount must be greater than zero");
            return Err(Error::invalid("Invalid amount"));
        }
        if let Err(e) = self.backend.update_record(&uid, id, &fields) {
            log::warn!("update of record {} failed: {}", id, e);
            self.raise(ALERT_UPDATE);
            return Err(e);
        }
        log::info!("updated record {}", id);
        self.refresh_after_write(&uid);
        Ok(())
    }

    /// Replaces the report with the one for `period`; keeps the old one on failure.
    pub fn fetch_report(&mut self, period: Period) -> Result<()> {
        let uid = self.require_user()?;
        match self.backend.report(&uid, period) {
            Ok(report) => {
                self.report = Some(report);
                self.report_period = Some(period);
                Ok(())
            }
            Err(e) => {
                log::warn!("{} report fetch failed: {}", period, e);
                self.raise(ALERT_REPORT);
                Err(e)
            }
        }
    }

    /// First-visit setup: creates the profile, then loads the main view.
    pub fn init_user(&mut self, currency: &str, start_balance: Decimal) -> Result<()> {
        let uid = self.require_user()?;
        let currency = currency.trim();
        if currency.is_empty() {
            self.raise("Currency is required");
            return Err(Error::invalid("Empty currency"));
        }
        let profile = UserProfile {
            user_id: uid.clone(),
            currency: currency.to_string(),
            start_balance: Some(start_balance),
        };
        if let Err(e) = self.backend.init_user(&profile) {
            log::warn!("init user failed: {}", e);
            self.raise(ALERT_INIT);
            return Err(e);
        }
        if let Err(e) = self.store.save_profile(&uid, currency, start_balance) {
            log::warn!("could not persist profile locally: {}", e);
        }
        self.currency = profile.currency.clone();
        self.profile = Some(profile);
        self.balance = Some(start_balance);
        log::info!("profile created for user {}", uid);
        self.load_main(&uid);
        Ok(())
    }

    pub fn begin_edit(&mut self, id: i64) -> Result<&mut Editor> {
        let Some(record) = self.records.iter().find(|r| r.id == id).cloned() else {
            self.raise(ALERT_NOT_FOUND);
            return Err(Error::NotFound(format!("Record {}", id)));
        };
        Ok(self.editor.insert(Editor {
            record,
            draft: RecordUpdate::default(),
        }))
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Sends the fields that differ from the cached record. The editor stays
    /// open if the update fails.
    pub fn submit_edit(&mut self) -> Result<()> {
        let Some(editor) = self.editor.take() else {
            return Err(Error::invalid("No record is being edited"));
        };
        let patch = editor.draft.clone().diff_against(&editor.record);
        if patch.is_empty() {
            log::info!("record {} unchanged", editor.record.id);
            return Ok(());
        }
        let id = editor.record.id;
        if let Err(e) = self.update_record(id, patch) {
            self.editor = Some(editor);
            return Err(e);
        }
        Ok(())
    }

    /// Resolves a category by id or by case-insensitive name.
    pub fn category_id_for(&self, key: &str) -> Result<i64> {
        let key = key.trim();
        if let Ok(id) = key.parse::<i64>() {
            if self.categories.is_empty() || self.categories.iter().any(|c| c.id == id) {
                return Ok(id);
            }
        }
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(key))
            .map(|c| c.id)
            .ok_or_else(|| Error::NotFound(format!("Category '{}'", key)))
    }

    pub fn category_name(&self, id: Option<i64>) -> String {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }
}

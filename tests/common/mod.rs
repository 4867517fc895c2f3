// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use minifin::api::Backend;
use minifin::controller::Controller;
use minifin::error::{Error, Result};
use minifin::models::{
    Category, NewRecord, Period, Record, RecordType, RecordUpdate, Report, UserProfile,
};
use minifin::store::Store;
use rust_decimal::Decimal;

/// Scripted in-memory backend with a call log.
pub struct FakeBackend {
    pub profile: RefCell<Option<UserProfile>>,
    pub categories: Vec<Category>,
    pub records: RefCell<Vec<Record>>,
    pub reports: RefCell<HashMap<Period, Report>>,
    pub patches: RefCell<Vec<(i64, RecordUpdate)>>,
    failing: RefCell<HashSet<&'static str>>,
    calls: RefCell<Vec<String>>,
    next_id: Cell<i64>,
}

pub fn dec(v: i64) -> Decimal {
    Decimal::new(v, 0)
}

pub fn report(label: &str, income: i64, expense: i64, start: Option<i64>) -> Report {
    Report {
        period_label: label.to_string(),
        income: dec(income),
        expense: dec(expense),
        start_balance: start.map(dec),
        data: None,
    }
}

pub fn record(id: i64, kind: RecordType, amount: i64) -> Record {
    Record {
        id,
        r#type: kind,
        amount: dec(amount),
        currency: "₽".into(),
        category_id: Some(1),
        description: None,
        created_at: None,
    }
}

impl FakeBackend {
    /// Profile with start balance 100, a yearly report of +500/-200 and
    /// reports for every other period.
    pub fn with_profile() -> Self {
        let fake = Self::empty();
        *fake.profile.borrow_mut() = Some(UserProfile {
            user_id: "42".into(),
            currency: "₽".into(),
            start_balance: Some(dec(100)),
        });
        {
            let mut reports = fake.reports.borrow_mut();
            reports.insert(Period::Day, report("Day", 10, 5, Some(100)));
            reports.insert(Period::Week, report("Week", 70, 20, Some(100)));
            reports.insert(Period::Month, report("Month", 300, 120, Some(100)));
            reports.insert(Period::Year, report("Year", 500, 200, Some(100)));
        }
        *fake.records.borrow_mut() = vec![
            record(2, RecordType::Expense, 200),
            record(1, RecordType::Income, 500),
        ];
        fake.next_id.set(3);
        fake
    }

    pub fn empty() -> Self {
        Self {
            profile: RefCell::new(None),
            categories: vec![
                Category {
                    id: 1,
                    name: "Food".into(),
                },
                Category {
                    id: 2,
                    name: "Salary".into(),
                },
            ],
            records: RefCell::new(Vec::new()),
            reports: RefCell::new(HashMap::new()),
            patches: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.borrow_mut().remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn hit(&self, call: String, op: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(op) {
            return Err(Error::Status {
                code: 500,
                body: "boom".into(),
            });
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn get_user(&self, _user_id: &str) -> Result<Option<UserProfile>> {
        self.hit("get_user".into(), "get_user")?;
        Ok(self.profile.borrow().clone())
    }

    fn init_user(&self, profile: &UserProfile) -> Result<()> {
        self.hit("init_user".into(), "init_user")?;
        *self.profile.borrow_mut() = Some(profile.clone());
        let mut reports = self.reports.borrow_mut();
        for p in Period::ALL {
            reports.insert(
                p,
                Report {
                    period_label: p.label().into(),
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                    start_balance: profile.start_balance,
                    data: None,
                },
            );
        }
        Ok(())
    }

    fn categories(&self) -> Result<Vec<Category>> {
        self.hit("categories".into(), "categories")?;
        Ok(self.categories.clone())
    }

    fn report(&self, _user_id: &str, period: Period) -> Result<Report> {
        self.hit(format!("report:{}", period.as_str()), "report")?;
        self.reports
            .borrow()
            .get(&period)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("report {}", period)))
    }

    fn records(&self, _user_id: &str) -> Result<Vec<Record>> {
        self.hit("records".into(), "records")?;
        Ok(self.records.borrow().clone())
    }

    fn add_record(&self, _user_id: &str, new: &NewRecord) -> Result<()> {
        self.hit("add".into(), "add")?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.records.borrow_mut().insert(
            0,
            Record {
                id,
                r#type: new.r#type,
                amount: new.amount,
                currency: new.currency.clone(),
                category_id: new.category_id,
                description: new.description.clone(),
                created_at: None,
            },
        );
        if let Some(year) = self.reports.borrow_mut().get_mut(&Period::Year) {
            match new.r#type {
                RecordType::Income => year.income += new.amount,
                RecordType::Expense => year.expense += new.amount,
            }
        }
        Ok(())
    }

    fn update_record(&self, _user_id: &str, id: i64, patch: &RecordUpdate) -> Result<()> {
        self.hit(format!("update:{}", id), "update")?;
        self.patches.borrow_mut().push((id, patch.clone()));
        if let Some(rec) = self.records.borrow_mut().iter_mut().find(|r| r.id == id) {
            if let Some(a) = patch.amount {
                rec.amount = a;
            }
            if let Some(t) = patch.r#type {
                rec.r#type = t;
            }
            if let Some(d) = &patch.description {
                rec.description = Some(d.clone());
            }
        }
        Ok(())
    }
}

pub fn controller(fake: FakeBackend) -> Controller<FakeBackend> {
    Controller::new(fake, Store::in_memory().unwrap(), Some("42".into()), "₽")
}

pub fn mounted() -> Controller<FakeBackend> {
    let mut ctrl = controller(FakeBackend::with_profile());
    ctrl.mount();
    ctrl.backend().clear_calls();
    ctrl
}

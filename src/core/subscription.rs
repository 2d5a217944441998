use rand::Rng;
use serde::Serialize;

use super::engine::DEFAULT_HORIZON_YEARS;
use super::sanitize::{FieldRule, SanitizedValue, sanitize};
use super::types::BillingPeriod;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Opaque line-item identifier; stable across edits of the item.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    fn fresh<R: Rng>(rng: &mut R) -> Self {
        let id = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LineItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionLineItem {
    pub id: LineItemId,
    pub name: String,
    pub cost: SanitizedValue,
    pub billing_period: BillingPeriod,
    pub active: bool,
}

impl SubscriptionLineItem {
    pub fn monthly_cost(&self) -> f64 {
        self.billing_period.monthly_amount(self.cost.value())
    }
}

/// A field edit; `None` leaves the field as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItemEdit {
    pub name: Option<String>,
    pub cost: Option<String>,
    pub billing_period: Option<BillingPeriod>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscriptionLedger {
    items: Vec<SubscriptionLineItem>,
}

impl SubscriptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starting list shown before the user edits anything.
    pub fn with_defaults() -> Self {
        let mut ledger = Self::new();
        for (id, name, cost) in [("1", "Netflix", 15.49), ("2", "Spotify", 10.99), ("3", "Gym", 60.0)] {
            ledger.insert(SubscriptionLineItem {
                id: LineItemId::from(id),
                name: name.to_string(),
                cost: SanitizedValue::Value(cost),
                billing_period: BillingPeriod::Monthly,
                active: true,
            });
        }
        ledger
    }

    pub fn items(&self) -> &[SubscriptionLineItem] {
        &self.items
    }

    pub fn get(&self, id: &LineItemId) -> Option<&SubscriptionLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Appends a blank, active, monthly item under a fresh id.
    pub fn add(&mut self) -> LineItemId {
        let mut rng = rand::thread_rng();
        let mut id = LineItemId::fresh(&mut rng);
        while self.get(&id).is_some() {
            id = LineItemId::fresh(&mut rng);
        }
        self.items.push(SubscriptionLineItem {
            id: id.clone(),
            name: String::new(),
            cost: SanitizedValue::Unset,
            billing_period: BillingPeriod::Monthly,
            active: true,
        });
        id
    }

    /// Inserts an item as given, replacing any existing item with the same id.
    pub fn insert(&mut self, item: SubscriptionLineItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Applies `edit` in place. Returns false when `id` is unknown.
    pub fn update(&mut self, id: &LineItemId, edit: LineItemEdit) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        if let Some(name) = edit.name {
            item.name = name;
        }
        if let Some(raw) = edit.cost {
            item.cost = sanitize(&raw, FieldRule::decimal());
        }
        if let Some(period) = edit.billing_period {
            item.billing_period = period;
        }
        if let Some(active) = edit.active {
            item.active = active;
        }
        true
    }

    pub fn toggle_active(&mut self, id: &LineItemId) -> bool {
        let Some(active) = self.get(id).map(|item| item.active) else {
            return false;
        };
        self.update(
            id,
            LineItemEdit {
                active: Some(!active),
                ..LineItemEdit::default()
            },
        )
    }

    pub fn remove(&mut self, id: &LineItemId) -> Option<SubscriptionLineItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Sum of active items, each normalized to a monthly figure.
    pub fn monthly_total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| item.active)
            .map(SubscriptionLineItem::monthly_cost)
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubscriptionMode {
    /// One total for everything, entered monthly or annually.
    Simple {
        total: SanitizedValue,
        billing_period: BillingPeriod,
    },
    Itemized(SubscriptionLedger),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionInputs {
    pub mode: SubscriptionMode,
    pub years: SanitizedValue,
}

impl SubscriptionInputs {
    /// An unset or zero horizon falls back to the default ten years.
    pub fn horizon_years(&self) -> f64 {
        self.years.nonzero_or(DEFAULT_HORIZON_YEARS)
    }

    pub fn ledger(&self) -> Option<&SubscriptionLedger> {
        match &self.mode {
            SubscriptionMode::Itemized(ledger) => Some(ledger),
            SubscriptionMode::Simple { .. } => None,
        }
    }
}

pub fn aggregate_monthly(inputs: &SubscriptionInputs) -> f64 {
    match &inputs.mode {
        SubscriptionMode::Simple {
            total,
            billing_period,
        } => billing_period.monthly_amount(total.value()),
        SubscriptionMode::Itemized(ledger) => ledger.monthly_total(),
    }
}

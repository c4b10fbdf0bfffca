use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{DomainError, DomainResult, Entity, Money, PartId, SupplierId};

/// Catalog record: one part reference held in stock.
///
/// The part is the sole owner of its quantity; issuances and consumed-part
/// lines only reference it. Quantity changes go through [`Part::withdraw`],
/// [`Part::restock`] or an inventory recount, never through field edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    /// Unique across the catalog, compared case-insensitively.
    pub reference: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    /// Reorder threshold; 0 in legacy records means "not set".
    pub quantity_min: u32,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub supplier_id: Option<SupplierId>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPart {
    pub reference: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub quantity_min: u32,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub supplier_id: Option<SupplierId>,
}

/// Editable part fields. Quantity is excluded: it is owned by the
/// consume/reverse/recount operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartUpdate {
    pub reference: String,
    pub name: String,
    pub description: String,
    pub quantity_min: u32,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub supplier_id: Option<SupplierId>,
}

impl Part {
    pub fn create(id: PartId, new: NewPart, now: DateTime<Utc>) -> DomainResult<Self> {
        let reference = normalize_reference(&new.reference)?;
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("part name cannot be empty"));
        }
        if new.purchase_price.is_negative() || new.sale_price.is_negative() {
            return Err(DomainError::validation("prices cannot be negative"));
        }
        Ok(Self {
            id,
            reference,
            name: new.name.trim().to_string(),
            description: new.description,
            quantity: new.quantity,
            quantity_min: new.quantity_min,
            purchase_price: new.purchase_price,
            sale_price: new.sale_price,
            supplier_id: new.supplier_id,
            created_at: now,
        })
    }

    pub fn apply_update(&mut self, update: PartUpdate) -> DomainResult<()> {
        let reference = normalize_reference(&update.reference)?;
        if update.name.trim().is_empty() {
            return Err(DomainError::validation("part name cannot be empty"));
        }
        if update.purchase_price.is_negative() || update.sale_price.is_negative() {
            return Err(DomainError::validation("prices cannot be negative"));
        }
        self.reference = reference;
        self.name = update.name.trim().to_string();
        self.description = update.description;
        self.quantity_min = update.quantity_min;
        self.purchase_price = update.purchase_price;
        self.sale_price = update.sale_price;
        self.supplier_id = update.supplier_id;
        Ok(())
    }

    /// Case-insensitive reference comparison, as the uniqueness rule demands.
    pub fn reference_matches(&self, other: &str) -> bool {
        self.reference.eq_ignore_ascii_case(other.trim())
    }

    /// Take `quantity` units out of stock.
    ///
    /// Fails with `InsufficientStock` (naming the part) rather than ever
    /// letting the quantity go negative.
    pub fn withdraw(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "withdrawal quantity must be a positive integer",
            ));
        }
        if self.quantity < quantity {
            return Err(DomainError::insufficient_stock(self.name.clone()));
        }
        self.quantity -= quantity;
        Ok(())
    }

    /// Return `quantity` units to stock (reversal of a consumed line).
    pub fn restock(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Overwrite the quantity from a physical recount, returning the previous
    /// value for the audit entry.
    pub fn recount(&mut self, new_quantity: u32) -> u32 {
        core::mem::replace(&mut self.quantity, new_quantity)
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.quantity_min
    }

    /// Threshold to compare against, with a fallback for legacy records that
    /// never had one set.
    pub fn effective_min(&self, fallback: u32) -> u32 {
        if self.quantity_min == 0 {
            fallback
        } else {
            self.quantity_min
        }
    }

    /// Purchase value of the units currently on hand.
    pub fn stock_value(&self) -> Money {
        self.purchase_price.times(self.quantity)
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> PartId {
        self.id
    }
}

/// Total purchase value of a set of parts (stock or per-supplier valuation).
pub fn stock_value<'a>(parts: impl IntoIterator<Item = &'a Part>) -> Money {
    parts.into_iter().map(Part::stock_value).sum()
}

fn normalize_reference(reference: &str) -> DomainResult<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("part reference cannot be empty"));
    }
    Ok(trimmed.to_string())
}

//! Parts catalog and supplier operations.

use std::sync::Arc;

use chrono::Utc;

use atelier_catalog::{NewPart, NewSupplier, Part, PartUpdate, Supplier, SupplierUpdate, stock_value};
use atelier_core::{Actor, DomainError, Money, PartId, SupplierId};
use atelier_store::GarageStore;
use serde::Serialize;

use crate::error::EngineResult;

/// Catalog-wide stock figures, computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    pub part_count: usize,
    pub low_stock_count: usize,
    pub total_value: Money,
}

/// Per-supplier stock figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierSummary {
    pub part_count: usize,
    pub stock_value: Money,
    pub low_stock_count: usize,
}

pub struct CatalogService {
    store: Arc<GarageStore>,
}

impl CatalogService {
    pub fn new(store: Arc<GarageStore>) -> Self {
        Self { store }
    }

    pub fn create_part(&self, actor: &Actor, new: NewPart) -> EngineResult<Part> {
        let _guard = self.store.mutate()?;
        self.ensure_reference_free(&new.reference, None)?;
        self.ensure_supplier_exists(new.supplier_id)?;
        let part = Part::create(PartId::new(), new, Utc::now())?;
        self.store.parts.insert(part.clone())?;
        tracing::info!(part_id = %part.id, reference = %part.reference, user = %actor.name, "part created");
        Ok(part)
    }

    /// Re-applies the duplicate-reference and supplier checks on every edit.
    pub fn update_part(&self, actor: &Actor, id: PartId, update: PartUpdate) -> EngineResult<Part> {
        let _guard = self.store.mutate()?;
        let mut part = self
            .store
            .parts
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("part"))?;
        self.ensure_reference_free(&update.reference, Some(id))?;
        self.ensure_supplier_exists(update.supplier_id)?;
        part.apply_update(update)?;
        self.store.parts.put(part.clone())?;
        tracing::info!(part_id = %id, user = %actor.name, "part updated");
        Ok(part)
    }

    /// Deletion is refused while issuances or consumed-part lines still
    /// reference the part.
    pub fn delete_part(&self, actor: &Actor, id: PartId) -> EngineResult<()> {
        actor.require_admin()?;
        let _guard = self.store.mutate()?;
        let part = self
            .store
            .parts
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("part"))?;
        let referenced = self.store.issuances.any(|s| s.part_id == id)?
            || self.store.interventions.any(|i| i.references_part(id))?;
        if referenced {
            return Err(DomainError::conflict(format!(
                "part '{}' is referenced by issuances or interventions",
                part.name
            ))
            .into());
        }
        self.store.parts.remove(&id)?;
        tracing::info!(part_id = %id, user = %actor.name, "part deleted");
        Ok(())
    }

    pub fn part(&self, id: PartId) -> EngineResult<Part> {
        Ok(self
            .store
            .parts
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("part"))?)
    }

    pub fn find_by_reference(&self, reference: &str) -> EngineResult<Option<Part>> {
        let matches = self
            .store
            .parts
            .filter(|p| p.reference_matches(reference))?;
        Ok(matches.into_iter().next())
    }

    pub fn list_parts(&self) -> EngineResult<Vec<Part>> {
        Ok(self.store.parts.list()?)
    }

    pub fn low_stock_parts(&self) -> EngineResult<Vec<Part>> {
        Ok(self.store.parts.filter(Part::is_low_stock)?)
    }

    pub fn stock_summary(&self) -> EngineResult<StockSummary> {
        let parts = self.store.parts.list()?;
        Ok(StockSummary {
            part_count: parts.len(),
            low_stock_count: parts.iter().filter(|p| p.is_low_stock()).count(),
            total_value: stock_value(&parts),
        })
    }

    pub fn create_supplier(&self, actor: &Actor, new: NewSupplier) -> EngineResult<Supplier> {
        let _guard = self.store.mutate()?;
        let supplier = Supplier::create(SupplierId::new(), new, Utc::now())?;
        self.store.suppliers.insert(supplier.clone())?;
        tracing::info!(supplier_id = %supplier.id, user = %actor.name, "supplier created");
        Ok(supplier)
    }

    pub fn update_supplier(
        &self,
        actor: &Actor,
        id: SupplierId,
        update: SupplierUpdate,
    ) -> EngineResult<Supplier> {
        let _guard = self.store.mutate()?;
        let mut supplier = self
            .store
            .suppliers
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("supplier"))?;
        supplier.apply_update(update)?;
        self.store.suppliers.put(supplier.clone())?;
        tracing::info!(supplier_id = %id, user = %actor.name, "supplier updated");
        Ok(supplier)
    }

    /// Deletion is refused while parts still reference the supplier.
    pub fn delete_supplier(&self, actor: &Actor, id: SupplierId) -> EngineResult<()> {
        actor.require_admin()?;
        let _guard = self.store.mutate()?;
        let supplier = self
            .store
            .suppliers
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("supplier"))?;
        if self.store.parts.any(|p| p.supplier_id == Some(id))? {
            return Err(DomainError::conflict(format!(
                "supplier '{}' still has parts associated",
                supplier.name
            ))
            .into());
        }
        self.store.suppliers.remove(&id)?;
        tracing::info!(supplier_id = %id, user = %actor.name, "supplier deleted");
        Ok(())
    }

    pub fn supplier(&self, id: SupplierId) -> EngineResult<Supplier> {
        Ok(self
            .store
            .suppliers
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("supplier"))?)
    }

    pub fn list_suppliers(&self) -> EngineResult<Vec<Supplier>> {
        Ok(self.store.suppliers.list()?)
    }

    pub fn parts_by_supplier(&self, id: SupplierId) -> EngineResult<Vec<Part>> {
        Ok(self.store.parts.filter(|p| p.supplier_id == Some(id))?)
    }

    pub fn supplier_summary(&self, id: SupplierId) -> EngineResult<SupplierSummary> {
        if self.store.suppliers.get(&id)?.is_none() {
            return Err(DomainError::not_found("supplier").into());
        }
        let parts = self.parts_by_supplier(id)?;
        Ok(SupplierSummary {
            part_count: parts.len(),
            stock_value: stock_value(&parts),
            low_stock_count: parts.iter().filter(|p| p.is_low_stock()).count(),
        })
    }

    fn ensure_reference_free(
        &self,
        reference: &str,
        exclude: Option<PartId>,
    ) -> EngineResult<()> {
        let clash = self
            .store
            .parts
            .any(|p| Some(p.id) != exclude && p.reference_matches(reference))?;
        if clash {
            return Err(DomainError::duplicate_reference(reference.trim()).into());
        }
        Ok(())
    }

    fn ensure_supplier_exists(&self, supplier_id: Option<SupplierId>) -> EngineResult<()> {
        if let Some(id) = supplier_id
            && self.store.suppliers.get(&id)?.is_none()
        {
            return Err(DomainError::invalid_supplier(id.to_string()).into());
        }
        Ok(())
    }
}

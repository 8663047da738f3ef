//! Order lifecycle: create, edit, remove, list, export.
//!
//! ```text
//! Drafted --calculate--> Calculated --add--> Saved
//!                                  \-------> Discarded (caller drops it)
//! Saved --edit--> Edited --confirm_edit--> Confirmed
//!                       \----------------> Discarded
//! Saved --remove--> Removed
//! ```
//!
//! Every committed mutation appends one audit entry after the store call
//! succeeds. A failed audit write is returned alongside the result and never
//! undoes the mutation. A failed write-through does: the in-memory change is
//! reverted before the error is returned.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::audit::{AuditError, AuditSink};
use crate::calculations::{CostInputs, compute_costs};
use crate::catalog::ReferenceCatalog;
use crate::models::{AuditEntry, AuditEvent, Order, OrderDraft, OrderEdit, Product, State};
use crate::repository::OrderRepository;
use crate::service::ServiceError;

/// Smallest order accepted, in square feet.
pub const MINIMUM_AREA: Decimal = Decimal::ONE_HUNDRED;

/// Service behavior that is fixed for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Where [`OrderService::export_all`] writes.
    pub export_destination: PathBuf,
    /// Rewrite the affected date partition after every mutation instead of
    /// waiting for [`OrderService::save`].
    pub write_through: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            export_destination: PathBuf::from("Backup/DataExport.txt"),
            write_through: false,
        }
    }
}

/// Result of a committed mutation.
///
/// `audit_warning` is set when the mutation succeeded but its audit entry
/// could not be written.
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub audit_warning: Option<AuditError>,
}

impl<T> Committed<T> {
    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn audited(&self) -> bool {
        self.audit_warning.is_none()
    }
}

pub struct OrderService<R, A> {
    repo: R,
    audit: A,
    catalog: ReferenceCatalog,
    options: ServiceOptions,
}

impl<R: OrderRepository, A: AuditSink> OrderService<R, A> {
    /// Wrap an already loaded repository.
    pub fn new(
        repo: R,
        audit: A,
        catalog: ReferenceCatalog,
        options: ServiceOptions,
    ) -> Self {
        Self {
            repo,
            audit,
            catalog,
            options,
        }
    }

    /// Load the repository and wrap it.
    pub fn open(
        mut repo: R,
        audit: A,
        catalog: ReferenceCatalog,
        options: ServiceOptions,
    ) -> Result<Self, ServiceError> {
        repo.load()?;
        Ok(Self::new(repo, audit, catalog, options))
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn products(&self) -> Vec<&Product> {
        self.catalog.products()
    }

    pub fn state_codes(&self) -> Vec<&str> {
        self.catalog.state_codes()
    }

    pub fn get(
        &self,
        date: NaiveDate,
        order_number: u32,
    ) -> Result<Order, ServiceError> {
        Ok(self.repo.get(date, order_number)?)
    }

    /// Orders placed on `date`. An empty day is an error here so callers can
    /// tell "nothing on that date" apart from a failed lookup.
    pub fn list_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Order>, ServiceError> {
        let orders = self.repo.all_for_date(date);
        if orders.is_empty() {
            return Err(ServiceError::NoOrdersForDate(date));
        }
        Ok(orders)
    }

    /// One more than the highest order number in the store, or 1 when the
    /// store is empty. Assumes a single writer.
    pub fn next_order_number(&self) -> Result<u32, ServiceError> {
        match self.repo.max_order_number() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ServiceError::invalid("order numbers exhausted")),
        }
    }

    /// Fully calculated order for `draft`, numbered but not stored.
    pub fn calculate(
        &self,
        draft: &OrderDraft,
    ) -> Result<Order, ServiceError> {
        self.validate_fields(&draft.customer_name, draft.area)?;
        let (product, state) = self.lookup(&draft.product_type, &draft.state)?;

        let costs = compute_costs(&CostInputs::from_catalog(draft.area, product, state))?;

        let order = Order {
            order_number: self.next_order_number()?,
            order_date: draft.order_date,
            customer_name: draft.customer_name.clone(),
            state: state.abbreviation.clone(),
            tax_rate: state.tax_rate,
            product_type: product.product_type.clone(),
            area: draft.area,
            cost_per_square_foot: product.cost_per_square_foot,
            labor_cost_per_square_foot: product.labor_cost_per_square_foot,
            material_cost: costs.material_cost,
            labor_cost: costs.labor_cost,
            tax: costs.tax,
            total: costs.total,
        };

        debug!(order_number = order.order_number, total = %order.total, "order calculated");
        Ok(order)
    }

    /// Store a calculated order. Rates are taken again from the catalog and
    /// the derived fields recomputed, so only the entered fields and the
    /// number are trusted.
    pub fn add(
        &mut self,
        order: Order,
    ) -> Result<Committed<Order>, ServiceError> {
        if order.order_number == 0 {
            return Err(ServiceError::invalid("order number must be positive"));
        }
        if self
            .repo
            .all()
            .iter()
            .any(|o| o.order_number == order.order_number)
        {
            return Err(ServiceError::invalid(format!(
                "order number {} is already in use",
                order.order_number
            )));
        }
        let order = self.price(order)?;

        self.store(order.clone())?;
        info!(order_number = order.order_number, date = %order.order_date, "order created");

        let audit_warning = self.audit(AuditEvent::Created {
            order_number: order.order_number,
        });
        Ok(Committed {
            value: order,
            audit_warning,
        })
    }

    /// Calculate and store in one step.
    pub fn create(
        &mut self,
        draft: &OrderDraft,
    ) -> Result<Committed<Order>, ServiceError> {
        let order = self.calculate(draft)?;
        self.add(order)
    }

    /// Recalculated copy of `original` with `candidate` applied. Nothing is
    /// written; pass the result to [`OrderService::confirm_edit`].
    pub fn edit(
        &self,
        original: &Order,
        candidate: &OrderEdit,
    ) -> Result<Order, ServiceError> {
        if candidate.matches(original) {
            return Err(ServiceError::NoChangeDetected(original.order_number));
        }
        self.validate_fields(&candidate.customer_name, candidate.area)?;
        let (product, state) = self.lookup(&candidate.product_type, &candidate.state)?;

        let mut edited = Order {
            customer_name: candidate.customer_name.clone(),
            state: state.abbreviation.clone(),
            tax_rate: state.tax_rate,
            product_type: product.product_type.clone(),
            area: candidate.area,
            cost_per_square_foot: product.cost_per_square_foot,
            labor_cost_per_square_foot: product.labor_cost_per_square_foot,
            ..original.clone()
        };
        compute_costs(&CostInputs::from_order(&edited))?.apply_to(&mut edited);
        Ok(edited)
    }

    /// Write an edited order over the stored one with the same number and
    /// date.
    pub fn confirm_edit(
        &mut self,
        order: Order,
    ) -> Result<Committed<Order>, ServiceError> {
        self.repo.get(order.order_date, order.order_number)?;
        let order = self.price(order)?;

        self.store(order.clone())?;
        info!(order_number = order.order_number, "order edited");

        let audit_warning = self.audit(AuditEvent::Edited {
            order_number: order.order_number,
        });
        Ok(Committed {
            value: order,
            audit_warning,
        })
    }

    pub fn remove(
        &mut self,
        date: NaiveDate,
        order_number: u32,
    ) -> Result<Committed<Order>, ServiceError> {
        let order = self.repo.get(date, order_number)?;
        let removed = self.repo.remove(&order)?;
        if let Err(error) = self.write_through(date) {
            self.repo.put(removed);
            return Err(error);
        }
        info!(order_number, %date, "order removed");

        let audit_warning = self.audit(AuditEvent::Removed { order_number });
        Ok(Committed {
            value: removed,
            audit_warning,
        })
    }

    /// Export every order to the configured destination. Returns the count.
    pub fn export_all(&mut self) -> Result<Committed<usize>, ServiceError> {
        let order_count = self.repo.export_all(&self.options.export_destination)?;
        info!(
            order_count,
            destination = %self.options.export_destination.display(),
            "orders exported"
        );

        let audit_warning = self.audit(AuditEvent::Exported { order_count });
        Ok(Committed {
            value: order_count,
            audit_warning,
        })
    }

    /// Flush every date partition that has orders.
    pub fn save(&mut self) -> Result<(), ServiceError> {
        self.repo.save()?;
        Ok(())
    }

    /// Save and release the repository.
    pub fn shutdown(mut self) -> Result<R, ServiceError> {
        self.save()?;
        Ok(self.repo)
    }

    /// `order` with its rates taken from the catalog and every derived field
    /// recomputed.
    fn price(
        &self,
        mut order: Order,
    ) -> Result<Order, ServiceError> {
        self.validate_fields(&order.customer_name, order.area)?;
        let (product, state) = self.lookup(&order.product_type, &order.state)?;

        order.state = state.abbreviation.clone();
        order.tax_rate = state.tax_rate;
        order.product_type = product.product_type.clone();
        order.cost_per_square_foot = product.cost_per_square_foot;
        order.labor_cost_per_square_foot = product.labor_cost_per_square_foot;
        compute_costs(&CostInputs::from_order(&order))?.apply_to(&mut order);
        Ok(order)
    }

    /// Put `order` and flush its partition. A failed flush puts back
    /// whatever the order replaced.
    fn store(
        &mut self,
        order: Order,
    ) -> Result<(), ServiceError> {
        let replaced = self.repo.put(order.clone());
        let Err(error) = self.write_through(order.order_date) else {
            return Ok(());
        };

        match replaced {
            Some(previous) => {
                self.repo.put(previous);
            }
            None => {
                if let Err(undo) = self.repo.remove(&order) {
                    warn!(order_number = order.order_number, %undo, "could not revert unsaved order");
                }
            }
        }
        Err(error)
    }

    fn lookup(
        &self,
        product_type: &str,
        state: &str,
    ) -> Result<(&Product, &State), ServiceError> {
        let product = self
            .catalog
            .product(product_type)
            .ok_or_else(|| ServiceError::UnknownProduct(product_type.to_string()))?;
        let state = self
            .catalog
            .state(state)
            .ok_or_else(|| ServiceError::UnknownState(state.to_string()))?;
        Ok((product, state))
    }

    fn validate_fields(
        &self,
        customer_name: &str,
        area: Decimal,
    ) -> Result<(), ServiceError> {
        if customer_name.trim().is_empty() {
            return Err(ServiceError::invalid("customer name is required"));
        }
        if !self.repo.accepts_customer_name(customer_name) {
            return Err(ServiceError::invalid(format!(
                "customer name {customer_name:?} contains a reserved character"
            )));
        }
        if area < MINIMUM_AREA {
            return Err(ServiceError::invalid(format!(
                "area must be at least {MINIMUM_AREA} square feet, got {area}"
            )));
        }
        Ok(())
    }

    fn write_through(
        &mut self,
        date: NaiveDate,
    ) -> Result<(), ServiceError> {
        if self.options.write_through {
            self.repo.save_partition(date)?;
        }
        Ok(())
    }

    fn audit(
        &mut self,
        event: AuditEvent,
    ) -> Option<AuditError> {
        let entry = AuditEntry::new(Local::now().naive_local(), event);
        match self.audit.record(&entry) {
            Ok(()) => None,
            Err(error) => {
                warn!(%event, %error, "audit entry not written; mutation stands");
                Some(error)
            }
        }
    }
}

//! Budget session state
//!
//! [`BudgetState`] owns everything one budgeting session works on: the
//! planned income, the allocation tree (absent until `start`) and the list
//! of standalone assets. It is constructed explicitly and handed around by
//! reference; there is no process-wide instance.

use tracing::debug;

use crate::error::{CashflowError, CashflowResult};
use crate::metrics::{MetricsEngine, Visualization};
use crate::models::node::validate_positive;
use crate::models::{Asset, Money, NodeGroup, NodeId};
use crate::services::tree::{AllocationTree, NodeEdit};

/// State of one budgeting session
#[derive(Debug, Clone, Default)]
pub struct BudgetState {
    planned_income: Money,
    tree: Option<AllocationTree>,
    assets: Vec<Asset>,
}

impl BudgetState {
    /// Create a session that has not been started yet
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        self.tree.is_some()
    }

    /// Planned monthly income (zero before `start`)
    pub fn planned_income(&self) -> Money {
        self.planned_income
    }

    /// The allocation tree of a started session
    pub fn tree(&self) -> CashflowResult<&AllocationTree> {
        self.tree.as_ref().ok_or(CashflowError::NotStarted)
    }

    fn tree_mut(&mut self) -> CashflowResult<&mut AllocationTree> {
        self.tree.as_mut().ok_or(CashflowError::NotStarted)
    }

    fn ensure_started(&self) -> CashflowResult<()> {
        self.tree().map(|_| ())
    }

    /// Metrics over the current tree
    pub fn metrics(&self) -> CashflowResult<MetricsEngine<'_>> {
        Ok(MetricsEngine::new(self.tree()?, self.planned_income))
    }

    // === Budget lifecycle ===

    /// Start the budget with a planned monthly income
    ///
    /// Creates the `Income` root. A session can only be started once.
    pub fn start(&mut self, income: Money) -> CashflowResult<()> {
        validate_positive(income, "Income")?;
        if self.is_started() {
            return Err(CashflowError::AlreadyStarted);
        }

        self.tree = Some(AllocationTree::new());
        self.planned_income = income;

        debug!(%income, "budget started");
        Ok(())
    }

    /// Change the planned monthly income
    pub fn edit_income(&mut self, income: Money) -> CashflowResult<()> {
        self.ensure_started()?;
        validate_positive(income, "Income")?;

        let previous = self.planned_income;
        self.planned_income = income;

        debug!(%previous, %income, "planned income changed");
        Ok(())
    }

    // === Node operations ===

    /// Allocate `amount` from `parent_label` to a new node
    pub fn add_node(
        &mut self,
        parent_label: &str,
        label: &str,
        amount: Money,
        group: NodeGroup,
        apr: f64,
        current_balance: Money,
    ) -> CashflowResult<NodeId> {
        self.tree_mut()?
            .add_node(parent_label, label, amount, group, apr, current_balance)
    }

    /// Edit label, amount, group or savings properties of a node
    pub fn edit_node(&mut self, label: &str, edit: &NodeEdit) -> CashflowResult<NodeId> {
        self.tree_mut()?.edit_node(label, edit)
    }

    /// Remove a node with all of its descendants
    pub fn remove_node(&mut self, label: &str) -> CashflowResult<Vec<String>> {
        self.tree_mut()?.remove_node(label)
    }

    /// All node labels in alphabetical order
    pub fn list_node_labels(&self) -> CashflowResult<Vec<String>> {
        Ok(self.tree()?.labels())
    }

    // === Asset operations ===

    /// Add a standalone asset
    pub fn add_asset(&mut self, name: &str, value: Money) -> CashflowResult<()> {
        self.ensure_started()?;

        let asset = Asset::new(name.trim(), value);
        asset.validate()?;
        if self.assets.iter().any(|a| a.name == asset.name) {
            return Err(CashflowError::duplicate_asset(&asset.name));
        }

        debug!(asset = %asset.name, value = %asset.value, "added asset");
        self.assets.push(asset);
        Ok(())
    }

    /// Remove a standalone asset by name
    pub fn remove_asset(&mut self, name: &str) -> CashflowResult<Asset> {
        self.ensure_started()?;

        let name = name.trim();
        let position = self
            .assets
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| CashflowError::asset_not_found(name))?;

        let removed = self.assets.remove(position);
        debug!(asset = %removed.name, "removed asset");
        Ok(removed)
    }

    /// Standalone assets in insertion order
    pub fn list_assets(&self) -> CashflowResult<&[Asset]> {
        self.ensure_started()?;
        Ok(&self.assets)
    }

    // === Queries ===

    /// Build the full visualization payload
    ///
    /// A projection is included only when `projection_months > 0`.
    pub fn visualization(&self, projection_months: u32) -> CashflowResult<Visualization> {
        let engine = self.metrics()?;
        Ok(Visualization::build(&engine, &self.assets, projection_months))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MAX_AMOUNT, MAX_APR};

    fn dollars(d: i64) -> Money {
        Money::from_dollars(d)
    }

    fn started(income: i64) -> BudgetState {
        let mut state = BudgetState::new();
        state.start(dollars(income)).unwrap();
        state
    }

    #[test]
    fn test_operations_require_start() {
        let mut state = BudgetState::new();
        assert!(matches!(
            state.add_node("Income", "Rent", dollars(1), NodeGroup::Expense, 0.0, Money::zero()),
            Err(CashflowError::NotStarted)
        ));
        assert!(matches!(state.edit_income(dollars(10)), Err(CashflowError::NotStarted)));
        assert!(matches!(state.add_asset("House", dollars(1)), Err(CashflowError::NotStarted)));
        assert!(matches!(state.list_node_labels(), Err(CashflowError::NotStarted)));
        assert!(matches!(state.visualization(0), Err(CashflowError::NotStarted)));
    }

    #[test]
    fn test_start_validation_and_restart() {
        let mut state = BudgetState::new();
        assert!(matches!(state.start(Money::zero()), Err(CashflowError::InvalidAmount(_))));
        assert!(!state.is_started());

        state.start(dollars(5000)).unwrap();
        assert!(matches!(state.start(dollars(10)), Err(CashflowError::AlreadyStarted)));
        assert_eq!(state.planned_income(), dollars(5000));
    }

    #[test]
    fn test_amounts_above_cap_are_rejected() {
        let huge = Money::from_cents(90_000_000_000_000_000);
        let mut state = BudgetState::new();
        assert!(matches!(state.start(huge), Err(CashflowError::InvalidAmount(_))));
        assert!(!state.is_started());

        let mut state = started(1000);
        assert!(matches!(
            state.add_node("Income", "A", huge, NodeGroup::Expense, 0.0, Money::zero()),
            Err(CashflowError::InvalidAmount(_))
        ));
        assert!(matches!(state.edit_income(huge), Err(CashflowError::InvalidAmount(_))));
        assert!(matches!(state.add_asset("Moon", huge), Err(CashflowError::InvalidAmount(_))));
        assert_eq!(state.list_node_labels().unwrap(), vec!["Income"]);
    }

    #[test]
    fn test_metrics_at_cap_do_not_overflow() {
        let mut state = BudgetState::new();
        state.start(MAX_AMOUNT).unwrap();
        for label in ["A", "B", "C"] {
            state
                .add_node("Income", label, MAX_AMOUNT, NodeGroup::Savings, MAX_APR, MAX_AMOUNT)
                .unwrap();
        }
        state.add_asset("House", MAX_AMOUNT).unwrap();
        state.add_asset("Land", MAX_AMOUNT).unwrap();

        let viz = state.visualization(240).unwrap();
        assert_eq!(viz.warnings, vec!["Overall budget"]);
        assert_eq!(viz.summary.total_allocated.cents(), MAX_AMOUNT.cents() * 3);

        let projection = viz.projection.unwrap();
        let last = projection.total[240];
        assert!(last > MAX_AMOUNT);
        assert!(last.cents() < i64::MAX);
    }

    #[test]
    fn test_edit_income() {
        let mut state = started(5000);
        state.edit_income(dollars(6000)).unwrap();
        assert_eq!(state.planned_income(), dollars(6000));
        assert!(state.edit_income(dollars(-1)).is_err());
        assert_eq!(state.planned_income(), dollars(6000));
    }

    #[test]
    fn test_list_node_labels_sorted() {
        let mut state = started(5000);
        state
            .add_node("Income", "Rent", dollars(1500), NodeGroup::Expense, 0.0, Money::zero())
            .unwrap();
        state
            .add_node("Income", "Bills", dollars(300), NodeGroup::Intermediate, 0.0, Money::zero())
            .unwrap();
        assert_eq!(state.list_node_labels().unwrap(), vec!["Bills", "Income", "Rent"]);
    }

    #[test]
    fn test_assets() {
        let mut state = started(5000);
        state.add_asset("House", dollars(300_000)).unwrap();
        state.add_asset("Car", dollars(12_000)).unwrap();

        let err = state.add_asset("House", dollars(1)).unwrap_err();
        assert!(err.is_duplicate_label());

        let err = state.remove_asset("Boat").unwrap_err();
        assert!(err.is_unknown_label());

        let removed = state.remove_asset("House").unwrap();
        assert_eq!(removed.value, dollars(300_000));
        assert_eq!(state.list_assets().unwrap(), &[Asset::new("Car", dollars(12_000))]);
    }

    #[test]
    fn test_duplicate_add_leaves_state_unchanged() {
        let mut state = started(5000);
        state
            .add_node("Income", "Rent", dollars(1500), NodeGroup::Expense, 0.0, Money::zero())
            .unwrap();
        let before = state.tree().unwrap().len();
        let err = state
            .add_node("Income", "Rent", dollars(20), NodeGroup::Expense, 0.0, Money::zero())
            .unwrap_err();
        assert!(err.is_duplicate_label());
        assert_eq!(state.tree().unwrap().len(), before);
    }
}

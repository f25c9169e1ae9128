//! The stock back-office catalogue.

use crate::actions::Action;
use crate::error::SchemaResult;
use crate::resources::{ReadVariant, ResourceNode, ResourceSchema};

const ALL: &[Action] = &[Action::Read, Action::Edit, Action::Delete];
const WRITE: &[Action] = &[Action::Edit, Action::Delete];

/// Declarative nodes of the stock catalogue.
pub fn builtin_nodes() -> Vec<ResourceNode> {
    vec![
        // Chip-only row shown on every role card
        ResourceNode::leaf("dashboard", "Dashboard", &[]),
        ResourceNode::group(
            "customers",
            "Customers",
            vec![
                ResourceNode::leaf("customers-crm", "CRM", WRITE).with_read_variants(vec![
                    ReadVariant::new("own", "CRM — Read (Own)"),
                    ReadVariant::new("all", "CRM — Read (All)"),
                ]),
                ResourceNode::leaf("customers-vendor", "Vendor", ALL),
            ],
        ),
        ResourceNode::group(
            "employees",
            "Employees",
            vec![
                ResourceNode::leaf("employees-directory", "Employee Directory", ALL),
                ResourceNode::leaf("employees-roles", "Roles", ALL),
                ResourceNode::leaf("employees-timesheets", "Timesheets", &[Action::Edit])
                    .with_read_variants(vec![
                        ReadVariant::new("own", "Timesheets — Read (Own)"),
                        ReadVariant::new("all", "Timesheets — Read (All)"),
                    ]),
            ],
        ),
        ResourceNode::group(
            "finance",
            "Finance",
            vec![
                ResourceNode::leaf("finance-invoices", "Invoices", ALL),
                ResourceNode::leaf("finance-expenses", "Expenses", WRITE).with_read_variants(
                    vec![
                        ReadVariant::new("own", "Expenses — Read (Own)"),
                        ReadVariant::new("all", "Expenses — Read (All)"),
                    ],
                ),
                ResourceNode::leaf("finance-payroll", "Payroll", ALL).admin_only(),
            ],
        ),
        ResourceNode::leaf("inventory", "Inventory", ALL),
        ResourceNode::leaf("reports", "Reports", &[Action::Read]),
        ResourceNode::leaf("analytics", "Analytics", &[Action::Read]).mocked(),
    ]
}

impl ResourceSchema {
    /// Compile the stock catalogue.
    pub fn builtin() -> SchemaResult<Self> {
        Self::new(builtin_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compiles() {
        let schema = ResourceSchema::builtin().unwrap();
        assert_eq!(schema.resources().len(), 7);
        assert!(schema.child("customers", "customers-crm").is_some());
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let schema = ResourceSchema::builtin().unwrap();
        assert!(schema.duplicate_names().is_empty());
        schema.check_names().unwrap();
    }

    #[test]
    fn test_builtin_catalogue_size() {
        let schema = ResourceSchema::builtin().unwrap();
        // CRM 4, Vendor 3, Directory 3, Roles 3, Timesheets 3,
        // Invoices 3, Expenses 4, Inventory 3, Reports 1
        assert_eq!(schema.all_permission_names().count(), 27);
        assert!(!schema.is_known("Payroll: Read"));
        assert!(!schema.is_known("Analytics: Read"));
    }

    #[test]
    fn test_builtin_round_trips_through_json() {
        let json = serde_json::to_string(&builtin_nodes()).unwrap();
        let schema = ResourceSchema::from_json(&json).unwrap();
        assert_eq!(schema.all_permission_names().count(), 27);
    }
}

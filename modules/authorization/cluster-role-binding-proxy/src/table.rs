//! Tabular rendering of cluster role bindings for CLI clients.

use apikit_meta::ListMeta;
use apikit_registry::{Table, TableColumnDefinition, TableConvertor, TableOptions, TableRow};
use authorization_sdk::{
    ClusterRoleBinding, ClusterRoleBindingList, GROUP_KIND, SERVICE_ACCOUNT_KIND,
    SYSTEM_GROUP_KIND, SYSTEM_USER_KIND, USER_KIND,
};

#[derive(Debug, Clone)]
pub struct ClusterRoleBindingTableConvertor {
    max_subjects: usize,
}

impl ClusterRoleBindingTableConvertor {
    /// `max_subjects` caps the names shown per cell; the rest is elided.
    #[must_use]
    pub fn new(max_subjects: usize) -> Self {
        Self { max_subjects }
    }

    fn columns() -> Vec<TableColumnDefinition> {
        vec![
            TableColumnDefinition::string("Name", "Name of the cluster role binding.", 0),
            TableColumnDefinition::string("Role", "Cluster role granted by the binding.", 0),
            TableColumnDefinition::string("Users", "Users the role is granted to.", 1),
            TableColumnDefinition::string("Groups", "Groups the role is granted to.", 1),
            TableColumnDefinition::string(
                "Service Accounts",
                "Service accounts the role is granted to.",
                1,
            ),
            TableColumnDefinition::string("Subjects", "Subjects of any other kind.", 1),
        ]
    }

    fn row(&self, binding: &ClusterRoleBinding) -> TableRow {
        let mut users = Vec::new();
        let mut groups = Vec::new();
        let mut service_accounts = Vec::new();
        let mut others = Vec::new();

        for subject in &binding.subjects {
            match subject.kind.as_str() {
                USER_KIND | SYSTEM_USER_KIND => users.push(subject.name.clone()),
                GROUP_KIND | SYSTEM_GROUP_KIND => groups.push(subject.name.clone()),
                SERVICE_ACCOUNT_KIND => service_accounts.push(format!(
                    "{}/{}",
                    subject.namespace.as_deref().unwrap_or_default(),
                    subject.name
                )),
                kind => others.push(format!("{kind}/{}", subject.name)),
            }
        }

        TableRow {
            cells: vec![
                binding.metadata.name.clone(),
                binding.role_ref.name.clone(),
                self.cell(&users),
                self.cell(&groups),
                self.cell(&service_accounts),
                self.cell(&others),
            ],
            object_name: binding.metadata.name.clone(),
        }
    }

    fn cell(&self, names: &[String]) -> String {
        if names.len() <= self.max_subjects {
            return names.join(", ");
        }
        let mut shown = names[..self.max_subjects].join(", ");
        if !shown.is_empty() {
            shown.push_str(", ");
        }
        shown.push_str("...");
        shown
    }

    fn table(
        &self,
        metadata: ListMeta,
        items: &[ClusterRoleBinding],
        options: TableOptions,
    ) -> Table {
        Table {
            metadata,
            column_definitions: if options.no_headers {
                Vec::new()
            } else {
                Self::columns()
            },
            rows: items.iter().map(|b| self.row(b)).collect(),
        }
    }
}

impl TableConvertor<ClusterRoleBinding> for ClusterRoleBindingTableConvertor {
    fn convert_to_table(&self, obj: &ClusterRoleBinding, options: TableOptions) -> Table {
        self.table(ListMeta::default(), std::slice::from_ref(obj), options)
    }
}

impl TableConvertor<ClusterRoleBindingList> for ClusterRoleBindingTableConvertor {
    fn convert_to_table(&self, obj: &ClusterRoleBindingList, options: TableOptions) -> Table {
        self.table(obj.metadata.clone(), &obj.items, options)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use apikit_meta::ObjectMeta;
    use authorization_sdk::ObjectReference;

    use super::*;

    fn binding() -> ClusterRoleBinding {
        ClusterRoleBinding {
            metadata: ObjectMeta::named("ops"),
            subjects: vec![
                ObjectReference::user("alice"),
                ObjectReference::user("bob"),
                ObjectReference::system_user("system:admin"),
                ObjectReference::group("devs"),
                ObjectReference::service_account("ci", "builder"),
                ObjectReference {
                    kind: "Robot".to_owned(),
                    name: "r2d2".to_owned(),
                    ..ObjectReference::default()
                },
            ],
            role_ref: ObjectReference::role("admin"),
        }
    }

    #[test]
    fn single_binding_row() {
        let convertor = ClusterRoleBindingTableConvertor::new(5);

        let table = convertor.convert_to_table(&binding(), TableOptions::default());

        assert_eq!(table.column_definitions.len(), 6);
        assert_eq!(table.column_definitions[4].name, "Service Accounts");
        assert_eq!(
            table.rows[0].cells,
            [
                "ops",
                "admin",
                "alice, bob, system:admin",
                "devs",
                "ci/builder",
                "Robot/r2d2"
            ]
        );
        assert_eq!(table.rows[0].object_name, "ops");
    }

    #[test]
    fn long_cells_are_truncated() {
        let convertor = ClusterRoleBindingTableConvertor::new(2);
        let table = convertor.convert_to_table(&binding(), TableOptions::default());
        assert_eq!(table.rows[0].cells[2], "alice, bob, ...");

        let none = ClusterRoleBindingTableConvertor::new(0);
        let table = none.convert_to_table(&binding(), TableOptions::default());
        assert_eq!(table.rows[0].cells[2], "...");
        assert_eq!(table.rows[0].cells[5], "...");
    }

    #[test]
    fn list_keeps_metadata_and_honours_no_headers() {
        let list = ClusterRoleBindingList {
            metadata: ListMeta {
                resource_version: Some("77".to_owned()),
                continue_token: Some("next".to_owned()),
                remaining_item_count: None,
            },
            items: vec![binding(), binding()],
        };

        let table = ClusterRoleBindingTableConvertor::new(5)
            .convert_to_table(&list, TableOptions { no_headers: true });

        assert!(table.column_definitions.is_empty());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.metadata, list.metadata);
    }
}

//! Recipient selection over the form-data directory

use std::collections::BTreeSet;

use crate::models::{DepartmentReceivers, Employee, FormMetadata};

/// Set of selected recipient ids with idempotent toggle semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSelection {
    selected: BTreeSet<i64>,
}

impl RecipientSelection {
    /// Toggle one recipient. Toggling twice restores the prior state.
    pub fn toggle(&mut self, user_id: i64) {
        if !self.selected.insert(user_id) {
            self.selected.remove(&user_id);
        }
    }

    /// Department-level select-all: selects every employee of the
    /// department, or deselects them all when they are already all selected.
    pub fn toggle_department(&mut self, department: &DepartmentReceivers) {
        if department.employees.is_empty() {
            return;
        }

        if self.department_fully_selected(department) {
            for employee in &department.employees {
                self.selected.remove(&employee.user_id);
            }
        } else {
            for employee in &department.employees {
                self.selected.insert(employee.user_id);
            }
        }
    }

    /// Whether every employee of the department is currently selected
    pub fn department_fully_selected(&self, department: &DepartmentReceivers) -> bool {
        !department.employees.is_empty()
            && department
                .employees
                .iter()
                .all(|e| self.selected.contains(&e.user_id))
    }

    pub fn is_selected(&self, user_id: i64) -> bool {
        self.selected.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }
}

/// Search the directory by name substring (case-insensitive) or by id.
/// An empty query matches everyone.
pub fn search_employees<'a>(metadata: &'a FormMetadata, query: &str) -> Vec<&'a Employee> {
    let query = query.trim();
    let lowered = query.to_lowercase();

    metadata
        .receivers
        .iter()
        .flat_map(|d| d.employees.iter())
        .filter(|e| {
            query.is_empty()
                || e.full_name.to_lowercase().contains(&lowered)
                || e.user_id.to_string() == query
        })
        .collect()
}

/// All employees of one department
pub fn employees_in_department(metadata: &FormMetadata, department_id: i64) -> Vec<&Employee> {
    metadata
        .receivers
        .iter()
        .filter(|d| d.department_id == department_id)
        .flat_map(|d| d.employees.iter())
        .collect()
}

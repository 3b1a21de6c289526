//! Employee directory.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::EmployeeProfile;

/// Read-only access to employee profiles.
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up an employee by identifier.
    fn get(&self, employee_id: &str) -> Option<EmployeeProfile>;
}

/// An in-memory directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: RwLock<HashMap<String, EmployeeProfile>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the given profiles.
    pub fn with_employees(employees: impl IntoIterator<Item = EmployeeProfile>) -> Self {
        let directory = Self::new();
        for employee in employees {
            directory.upsert(employee);
        }
        directory
    }

    /// Adds or replaces a profile.
    pub fn upsert(&self, employee: EmployeeProfile) {
        self.employees.write().insert(employee.id.clone(), employee);
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn get(&self, employee_id: &str) -> Option<EmployeeProfile> {
        self.employees.read().get(employee_id).cloned()
    }
}

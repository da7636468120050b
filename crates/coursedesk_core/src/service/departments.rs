//! Department-specific service operations.

use crate::filter::ALL;
use crate::model::department::Department;
use crate::model::schema::NoFilter;
use crate::service::entity::EntityService;
use crate::store::RecordStore;
use log::warn;

pub type DepartmentService<S> = EntityService<S, Department>;

/// Value/label pair for a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Leading "no constraint" option for a filter control.
    pub fn all(label: impl Into<String>) -> Self {
        Self::new(ALL, label)
    }
}

impl<S: RecordStore> EntityService<S, Department> {
    /// Department filter options, led by `All Departments`.
    ///
    /// Falls back to the `All` option alone when departments cannot be read.
    pub fn options(&self) -> Vec<SelectOption> {
        let mut options = vec![SelectOption::all("All Departments")];
        match self.list(&NoFilter) {
            Ok(departments) => options.extend(
                departments
                    .into_iter()
                    .map(|department| SelectOption::new(department.name.clone(), department.name)),
            ),
            Err(err) => {
                warn!("event=department_options module=service status=degraded error={err}");
            }
        }
        options
    }
}

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Current residential address of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub address: String,
    pub moved_in: NaiveDate,
}

/// Snapshot of a customer handed to every check of the `Customer` category.
///
/// `today` pins the evaluation date so date based checks stay pure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContext {
    pub id: String,
    pub dob: NaiveDate,
    #[serde(default)]
    pub address: Option<CustomerAddress>,
    pub today: NaiveDate,
}

impl CustomerContext {
    pub fn new(id: impl Into<String>, dob: NaiveDate) -> Self {
        Self {
            id: id.into(),
            dob,
            address: None,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>, moved_in: NaiveDate) -> Self {
        self.address = Some(CustomerAddress {
            address: address.into(),
            moved_in,
        });
        self
    }

    /// Evaluates date rules as of `today` instead of the local date.
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

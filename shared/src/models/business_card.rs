//! Business Card Model

use serde::{Deserialize, Serialize};

/// Seller contact block printed at the top of exported offers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessCard {
    pub company: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

impl BusinessCard {
    pub fn is_empty(&self) -> bool {
        self.company.trim().is_empty()
            && self.full_name.trim().is_empty()
            && self.phone.trim().is_empty()
            && self.email.trim().is_empty()
    }
}

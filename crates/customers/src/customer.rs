use serde::{Deserialize, Serialize};

use reelhouse_core::{CustomerId, DomainError, DomainResult, Entity};

/// A registered member of the rental service.
///
/// Gold membership is carried for pricing/perk decisions made elsewhere; it
/// does not change how returns are processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    phone: String,
    is_gold: bool,
}

impl Customer {
    /// Register a customer.
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        phone: impl Into<String>,
        is_gold: bool,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(DomainError::validation("phone cannot be empty"));
        }

        Ok(Self {
            id,
            name,
            phone,
            is_gold,
        })
    }

    /// Reassemble a customer from previously persisted state.
    ///
    /// For storage adapters; assumes the fields already passed validation.
    pub fn from_parts(id: CustomerId, name: String, phone: String, is_gold: bool) -> Self {
        Self {
            id,
            name,
            phone,
            is_gold,
        }
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn is_gold(&self) -> bool {
        self.is_gold
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

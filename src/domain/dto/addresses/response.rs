use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dto::pagination::Pagination;
use crate::domain::entities::Address;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: String,
    pub id_user: String,
    pub name: String,
    pub city: String,
    pub street: String,
    pub lat: String,
    pub long: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id.to_string(),
            id_user: address.id_user.to_string(),
            name: address.name,
            city: address.city,
            street: address.street,
            lat: address.lat,
            long: address.long,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListAddressResponse {
    pub addresses: Vec<AddressResponse>,
    pub pagination: Pagination,
}

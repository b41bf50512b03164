//! Domain aggregates exposed by the grounds service layer.

pub mod fulfilment;
pub mod owner;
pub mod portfolio;
pub mod price_entry;
pub mod property;
pub mod property_service;
pub mod quote;
pub mod region;
pub mod service_event;
pub mod service_person;
pub mod ticket;
pub mod types;

//! Database models shared across the grounds repository.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod owner;
pub mod price_entry;
pub mod property;
pub mod quote;
pub mod region;
pub mod service_event;
pub mod service_person;
pub mod ticket;
pub mod zmq;

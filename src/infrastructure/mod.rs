//! Infrastructure layer: concrete adapters behind the domain ports.

pub mod dto;
pub mod gateway;
pub mod repository;

//! Business services for the customer API.

pub mod customers;

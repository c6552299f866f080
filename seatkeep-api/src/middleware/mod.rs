pub mod customer;

pub use customer::{customer_middleware, Customer, CUSTOMER_HEADER};

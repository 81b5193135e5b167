pub mod contact_store;
pub mod contact_validator;

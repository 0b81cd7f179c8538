pub mod connect;
pub mod contract_deposit;
pub mod hash_deposit;
pub mod related_deposit;

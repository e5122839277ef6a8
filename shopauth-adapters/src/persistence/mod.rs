pub mod in_memory_account_store;
pub mod postgres_account_store;

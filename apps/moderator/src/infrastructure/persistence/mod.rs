pub mod json_ledger_store;

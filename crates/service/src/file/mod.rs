pub mod roster_store;

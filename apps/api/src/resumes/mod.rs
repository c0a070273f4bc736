// Resume Store lifecycle: create, update, trash, restore, purge.

pub mod handlers;
pub mod ownership;
pub mod purge;
pub mod service;

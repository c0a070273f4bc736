// Admin-only views over accounts and leads.

pub mod handlers;

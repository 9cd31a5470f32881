//! Admin policy adapters.

mod allowlist;

pub use allowlist::AllowlistAdminPolicy;

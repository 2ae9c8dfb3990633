// Adapters layer: concrete implementations for external systems (menu sources, signing, http).

pub mod server;
pub mod signer;
pub mod source;

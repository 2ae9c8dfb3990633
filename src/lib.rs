pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{server::router, signer::NostrSigner};
pub use config::{MenuSourceKind, ServerConfig};
pub use core::{gacha::Gacha, menu_store::MenuStore, responder::Responder};
pub use utils::error::{GachaError, Result};

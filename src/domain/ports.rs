use crate::domain::model::MenuInfo;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where menu documents come from.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch(&self) -> Result<MenuInfo>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;

    /// Whether the store should keep reloading from this source.
    fn refreshable(&self) -> bool {
        true
    }
}

/// Identity capability: derive a public key and sign a 32-byte digest.
pub trait EventSigner: Send + Sync {
    /// Hex x-only public key.
    fn public_key(&self) -> Result<String>;

    /// Hex signature over `digest`.
    fn sign(&self, digest: &[u8; 32]) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn bot_secret(&self) -> Option<&str>;
    fn port(&self) -> u16;
    fn menu_url(&self) -> &str;
    fn refresh_interval_secs(&self) -> u64;
}

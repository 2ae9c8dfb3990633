use crate::domain::model::MenuInfo;
use crate::domain::ports::MenuSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MENU_URL: &str =
    "https://raw.githubusercontent.com/ryohidaka/saizeriya-menus/main/saizeriya.json";

const EMBEDDED_MENU: &str = include_str!("../../data/saizeriya.json");

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Menu document hosted over HTTP.
pub struct RemoteMenuSource {
    client: Client,
    url: String,
}

impl RemoteMenuSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MenuSource for RemoteMenuSource {
    async fn fetch(&self) -> Result<MenuInfo> {
        tracing::debug!("Making menu request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        tracing::debug!("Menu response status: {}", response.status());

        let info = response.error_for_status()?.json::<MenuInfo>().await?;
        Ok(info)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Menu document on the local filesystem, re-read on every refresh.
pub struct FileMenuSource {
    path: PathBuf,
}

impl FileMenuSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MenuSource for FileMenuSource {
    async fn fetch(&self) -> Result<MenuInfo> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Menu bundled into the binary at build time.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedMenuSource;

impl EmbeddedMenuSource {
    pub fn parse() -> Result<MenuInfo> {
        Ok(serde_json::from_str(EMBEDDED_MENU)?)
    }
}

#[async_trait]
impl MenuSource for EmbeddedMenuSource {
    async fn fetch(&self) -> Result<MenuInfo> {
        Self::parse()
    }

    fn describe(&self) -> String {
        "embedded menu".to_string()
    }

    fn refreshable(&self) -> bool {
        false
    }
}

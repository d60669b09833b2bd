// Selectable assets and the quote currencies each can be traded against.
use crate::client::{AssetPair, MarketDataClient};
use crate::data::reference::AssetDirectory;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectableAsset {
    /// API asset code, e.g. `XETH`.
    pub code: String,
    pub altname: String,
    /// Display name from the reference file.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MarketCatalog {
    assets: Vec<SelectableAsset>,
    pairs: Vec<AssetPair>,
}

impl MarketCatalog {
    /// Queries `requested` assets and all tradable pairs, keeping only pairs
    /// whose base is one of the returned assets. Every returned asset must
    /// have a display name.
    pub async fn load(
        client: &dyn MarketDataClient,
        directory: &AssetDirectory,
        requested: &[String],
    ) -> Result<Self> {
        let infos = client.assets(requested).await?;
        let assets = infos
            .into_iter()
            .map(|(code, info)| -> Result<SelectableAsset> {
                let name = directory.name_of(&code).ok_or_else(|| {
                    EngineError::ConfigError(format!("No display name for asset code '{}'", code))
                })?;
                Ok(SelectableAsset { name: name.to_string(), code, altname: info.altname })
            })
            .collect::<Result<Vec<_>>>()?;

        let pairs: Vec<AssetPair> = client
            .pairs()
            .await?
            .into_values()
            .filter(|pair| assets.iter().any(|a| a.code == pair.base))
            .collect();

        tracing::info!(assets = assets.len(), pairs = pairs.len(), "Loaded market catalog");
        Ok(MarketCatalog { assets, pairs })
    }

    pub fn assets(&self) -> &[SelectableAsset] {
        &self.assets
    }

    /// Accepts a display name, an API code or an altname.
    pub fn find_asset(&self, key: &str) -> Option<&SelectableAsset> {
        self.assets
            .iter()
            .find(|a| a.name == key || a.code == key || a.altname.eq_ignore_ascii_case(key))
    }

    /// Quote currencies tradable against `base_code`, sorted descending.
    pub fn quotes_for(&self, base_code: &str) -> Vec<String> {
        let mut quotes: Vec<String> = self
            .pairs
            .iter()
            .filter(|p| p.base == base_code)
            .map(|p| p.quote.clone())
            .collect();
        quotes.sort_by(|a, b| b.cmp(a));
        quotes.dedup();
        quotes
    }

    /// The pair code the trade endpoint expects: base code followed by quote
    /// code.
    pub fn pair_code(&self, base_code: &str, quote: &str) -> Result<String> {
        if self.pairs.iter().any(|p| p.base == base_code && p.quote == quote) {
            Ok(format!("{}{}", base_code, quote))
        } else {
            Err(EngineError::InvalidRequest(format!(
                "'{}' is not tradable against '{}'",
                base_code, quote
            )))
        }
    }
}

//! Local rule-based provider.

use async_trait::async_trait;

use super::{ProviderResult, SqlProvider};
use crate::bounds::DateBounds;
use crate::config::TableIdent;
use crate::translation;

/// Wraps [`translation::translate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RulesProvider;

#[async_trait]
impl SqlProvider for RulesProvider {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn translate(
        &self,
        text: &str,
        table: &TableIdent,
        bounds: &DateBounds,
    ) -> ProviderResult<String> {
        Ok(translation::translate(text, table, bounds)?)
    }
}

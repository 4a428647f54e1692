use crate::error::AnalysisError;
use crate::models::{Analysis, AnalysisId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dominant_colors::ExclusionSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage for per-upload analyses
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Store or replace an analysis
    async fn insert(&self, analysis: Analysis) -> Result<(), AnalysisError>;

    async fn get(&self, id: &AnalysisId) -> Result<Option<Analysis>, AnalysisError>;

    /// Replace the exclusion set of an analysis, returning the updated record
    async fn set_exclusions(
        &self,
        id: &AnalysisId,
        exclusions: ExclusionSet,
    ) -> Result<Option<Analysis>, AnalysisError>;

    /// Remove and return every analysis created before `cutoff`
    async fn remove_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Analysis>, AnalysisError>;

    async fn len(&self) -> usize;
}

/// In-memory analysis storage
pub struct InMemoryAnalysisStore {
    analyses: Arc<RwLock<HashMap<AnalysisId, Analysis>>>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self {
            analyses: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryAnalysisStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn insert(&self, analysis: Analysis) -> Result<(), AnalysisError> {
        let mut analyses = self.analyses.write().await;
        analyses.insert(analysis.id, analysis);
        Ok(())
    }

    async fn get(&self, id: &AnalysisId) -> Result<Option<Analysis>, AnalysisError> {
        let analyses = self.analyses.read().await;
        Ok(analyses.get(id).cloned())
    }

    async fn set_exclusions(
        &self,
        id: &AnalysisId,
        exclusions: ExclusionSet,
    ) -> Result<Option<Analysis>, AnalysisError> {
        let mut analyses = self.analyses.write().await;
        Ok(analyses.get_mut(id).map(|analysis| {
            analysis.exclusions = exclusions;
            analysis.clone()
        }))
    }

    async fn remove_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Analysis>, AnalysisError> {
        let mut analyses = self.analyses.write().await;
        let expired: Vec<AnalysisId> = analyses
            .values()
            .filter(|a| a.created_at < cutoff)
            .map(|a| a.id)
            .collect();
        Ok(expired
            .iter()
            .filter_map(|id| analyses.remove(id))
            .collect())
    }

    async fn len(&self) -> usize {
        self.analyses.read().await.len()
    }
}

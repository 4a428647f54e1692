use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use dominant_colors::{recalculate, ColorExtractor, ExclusionSet, ExtractionResult, KmeansExtractor};
use std::sync::Arc;
use std::time::Duration;

use super::analysis_store::{AnalysisStore, InMemoryAnalysisStore};
use super::image_decoder::{decode_pixels, ImageKind};
use super::template_service::TemplateService;
use super::upload_storage::{sanitize_filename, UploadStorage};
use crate::error::AnalysisError;
use crate::models::{Analysis, AnalysisConfig, AnalysisId, AnalysisView, AppConfig};
use crate::rendering::{ChartRenderer, PieChart, SvgChartRenderer, SvgRasterizer};

/// Orchestrates decode → extract → store on upload, and
/// recalculate → chart → view on every read or exclusion update.
pub struct AnalysisPipeline {
    settings: AnalysisConfig,
    retention: Duration,
    extractor: Arc<dyn ColorExtractor>,
    renderer: Arc<dyn ChartRenderer>,
    storage: UploadStorage,
    store: Arc<dyn AnalysisStore>,
}

impl AnalysisPipeline {
    /// Build the production pipeline: k-means extraction, SVG charts and an
    /// in-memory store over `config.uploads.dir`.
    pub fn from_config(
        config: &AppConfig,
        templates: Arc<TemplateService>,
    ) -> Result<Self, AnalysisError> {
        let extractor = Arc::new(KmeansExtractor::new(config.analysis.extract_options()));
        let renderer = Arc::new(SvgChartRenderer::new(
            templates,
            Arc::new(SvgRasterizer::new()),
            config.chart,
        ));
        let storage = UploadStorage::new(&config.uploads.dir)?;

        Ok(Self::new(
            config,
            extractor,
            renderer,
            storage,
            Arc::new(InMemoryAnalysisStore::new()),
        ))
    }

    pub fn new(
        config: &AppConfig,
        extractor: Arc<dyn ColorExtractor>,
        renderer: Arc<dyn ChartRenderer>,
        storage: UploadStorage,
        store: Arc<dyn AnalysisStore>,
    ) -> Self {
        Self {
            settings: config.analysis.clone(),
            retention: Duration::from_secs(config.uploads.retention_secs),
            extractor,
            renderer,
            storage,
            store,
        }
    }

    pub fn storage(&self) -> &UploadStorage {
        &self.storage
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Analyze a new upload and remember it.
    ///
    /// Nothing is written to disk or the store unless decoding and
    /// extraction succeed.
    pub async fn analyze_upload(
        &self,
        file_name: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Analysis, AnalysisError> {
        let kind = ImageKind::detect(file_name, &bytes)?;
        let (bytes, result) = self.extract(bytes, kind).await?;

        let id = AnalysisId::new();
        let stored_name = self.storage.save(&id, kind, &bytes).await?;
        let original_name = sanitize_filename(file_name.unwrap_or_default());

        let analysis = Analysis::new(id, stored_name, original_name, result);
        self.store.insert(analysis.clone()).await?;

        tracing::info!(
            analysis = %analysis.id,
            file = %analysis.original_name,
            colors = analysis.result.len(),
            pixels = analysis.result.total_pixels(),
            "Analyzed upload"
        );

        Ok(analysis)
    }

    /// Look up an analysis, re-extracting it from its stored upload when the
    /// record itself is gone.
    pub async fn load(&self, id: &AnalysisId) -> Result<Analysis, AnalysisError> {
        if let Some(analysis) = self.store.get(id).await? {
            return Ok(analysis);
        }

        let stored_name = self
            .storage
            .find(id)
            .await
            .ok_or_else(|| AnalysisError::NotFound(id.to_string()))?;

        let bytes = self.storage.read(&stored_name).await?;
        let kind = match ImageKind::from_file_name(&stored_name) {
            Some(kind) => kind,
            None => ImageKind::detect(None, &bytes)?,
        };
        let (_, result) = self.extract(bytes, kind).await?;

        let analysis = Analysis::new(*id, stored_name.clone(), stored_name, result);
        self.store.insert(analysis.clone()).await?;

        tracing::info!(analysis = %id, "Recovered analysis from stored upload");
        Ok(analysis)
    }

    /// Replace the exclusion set of an analysis.
    pub async fn update_exclusions(
        &self,
        id: &AnalysisId,
        exclusions: ExclusionSet,
    ) -> Result<Analysis, AnalysisError> {
        // Make sure the record exists (recovering it if needed)
        self.load(id).await?;

        let analysis = self
            .store
            .set_exclusions(id, exclusions)
            .await?
            .ok_or_else(|| AnalysisError::NotFound(id.to_string()))?;

        tracing::debug!(
            analysis = %id,
            excluded = %analysis.exclusions,
            "Updated exclusions"
        );

        Ok(analysis)
    }

    /// Recalculate percentages and render the chart for the current exclusions.
    pub async fn view(&self, analysis: &Analysis) -> Result<AnalysisView, AnalysisError> {
        let breakdown = recalculate(&analysis.result, &analysis.exclusions);
        let chart = PieChart::from_breakdown(&breakdown);
        let title = chart.title.clone();
        let png = self.render_chart(chart).await?;

        Ok(AnalysisView::new(
            analysis,
            &breakdown,
            title,
            STANDARD.encode(png),
        ))
    }

    /// Chart PNG for the current exclusions.
    pub async fn chart_png(&self, analysis: &Analysis) -> Result<Vec<u8>, AnalysisError> {
        let breakdown = recalculate(&analysis.result, &analysis.exclusions);
        self.render_chart(PieChart::from_breakdown(&breakdown)).await
    }

    /// Drop analyses (and their uploads) older than the retention period.
    /// Returns the number of analyses removed.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, AnalysisError> {
        let retention = chrono::Duration::from_std(self.retention)
            .map_err(|e| AnalysisError::Task(e.to_string()))?;
        let removed = self.store.remove_older_than(now - retention).await?;

        for analysis in &removed {
            if let Err(e) = self.storage.remove(&analysis.stored_name).await {
                tracing::warn!(
                    file = %analysis.stored_name,
                    error = %e,
                    "Failed to delete expired upload"
                );
            }
        }

        if !removed.is_empty() {
            tracing::info!(count = removed.len(), "Expired analyses removed");
        }
        Ok(removed.len())
    }

    /// Run [`sweep_expired`](Self::sweep_expired) every `every` until the
    /// runtime shuts down.
    pub fn spawn_retention_sweep(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep_expired(Utc::now()).await {
                    tracing::warn!(error = %e, "Retention sweep failed");
                }
            }
        })
    }

    /// Decode and cluster on the blocking pool; hands the bytes back.
    async fn extract(
        &self,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<(Vec<u8>, ExtractionResult), AnalysisError> {
        let extractor = self.extractor.clone();
        let k = self.settings.cluster_count;
        let max_dimension = self.settings.max_dimension;

        tokio::task::spawn_blocking(move || -> Result<_, AnalysisError> {
            let decoded = decode_pixels(&bytes, kind, max_dimension)?;
            let start = std::time::Instant::now();
            let result = extractor.extract(&decoded.pixels, k)?;
            tracing::debug!(
                width = decoded.width,
                height = decoded.height,
                samples = decoded.pixels.len(),
                clusters = result.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Extracted colors"
            );
            Ok((bytes, result))
        })
        .await
        .map_err(|e| AnalysisError::Task(e.to_string()))?
    }

    async fn render_chart(&self, chart: PieChart) -> Result<Vec<u8>, AnalysisError> {
        let renderer = self.renderer.clone();
        let png = tokio::task::spawn_blocking(move || renderer.render(&chart))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))??;
        Ok(png)
    }
}

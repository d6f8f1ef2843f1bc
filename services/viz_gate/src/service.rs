//! The three interpret operations, independent of HTTP.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use viz_adapter::{AdapterError, ContentReader};
use viz_cache::{CacheError, DataCache};
use viz_data::{DataError, Dataset};
use viz_engine::matching::match_datasets;
use viz_engine::{
    write_page, Action, BuildOutput, ControlWriter, Controls, D3Builder, EngineError, PageParts,
};

pub const DEFAULT_VIS_ID: &str = "visualization";
pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 600;
/// Sizes below this are treated as unset.
pub const MIN_SIZE: i32 = 5;
pub const CONTROLS_ID: &str = "controls";
pub const CONTROL_FACTORY: &str = "VizControlFactory";
const INLINE_DATA_NAME: &str = "payload";
const DEFAULT_TITLE: &str = "vizgate";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Could not execute spec: {spec}: {source}")]
    Spec {
        spec: String,
        #[source]
        source: EngineError,
    },

    #[error("Could not create data as CSV from content: {0}")]
    InlineData(#[source] DataError),

    #[error("Could not read data as CSV from: {url}")]
    ReadData {
        url: String,
        #[source]
        source: CacheError,
    },

    #[error("Could not read spec from: {url}")]
    ReadSpec {
        url: String,
        #[source]
        source: AdapterError,
    },

    #[error("Could not read data for match: {0}")]
    MatchData(#[source] CacheError),

    #[error("Could not match spec to new data: {0}")]
    Match(#[source] EngineError),

    #[error("missing required parameter: {0}")]
    MissingParam(&'static str),
}

impl ServiceError {
    fn spec(spec: &str, source: EngineError) -> Self {
        Self::Spec {
            spec: spec.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationResult {
    pub js: String,
    pub css: String,
    pub controls: Controls,
}

impl From<BuildOutput> for VisualizationResult {
    fn from(out: BuildOutput) -> Self {
        Self {
            js: out.js,
            css: out.css,
            controls: out.controls,
        }
    }
}

/// Inputs for a full page.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub spec: Option<String>,
    pub spec_url: Option<String>,
    pub width: i32,
    pub height: i32,
    pub data_url: Option<String>,
    pub asset_base: Option<String>,
}

pub struct VizService {
    data: DataCache,
    reader: ContentReader,
    asset_base: String,
}

impl VizService {
    pub fn new(data: DataCache, reader: ContentReader, asset_base: impl Into<String>) -> Self {
        Self {
            data,
            reader,
            asset_base: asset_base.into(),
        }
    }

    /// JS/CSS/controls for `spec` over the CSV `payload`.
    ///
    /// A `data(...)` command in the spec wins over the payload, which may
    /// then be blank.
    pub async fn create_visualization(
        &self,
        payload: &str,
        spec: Option<&str>,
        width: i32,
        height: i32,
        vis_id: Option<&str>,
    ) -> Result<VisualizationResult> {
        let spec = spec.ok_or(ServiceError::MissingParam("src"))?;
        let action = parse(spec)?;
        let dataset = match action.data_ref() {
            Some(url) => self.load(url).await?,
            None => Dataset::from_csv(INLINE_DATA_NAME, payload).map_err(ServiceError::InlineData)?,
        };
        let vis_id = vis_id.unwrap_or(DEFAULT_VIS_ID);
        Ok(build(&action, spec, &dataset, vis_id, width, height)?.into())
    }

    /// A standalone HTML page for a spec given inline or by URL.
    pub async fn create_page(&self, req: PageRequest) -> Result<String> {
        let spec = match (req.spec, req.spec_url) {
            (Some(spec), _) => spec,
            (None, Some(url)) => match self.reader.read(&url).await {
                Ok(text) => text,
                Err(source) => return Err(ServiceError::ReadSpec { url, source }),
            },
            (None, None) => return Err(ServiceError::MissingParam("brunel_src")),
        };
        let action = parse(&spec)?;

        let data_url = action
            .data_ref()
            .or(req.data_url.as_deref())
            .ok_or(ServiceError::MissingParam("data"))?;
        let dataset = self.load(data_url).await?;

        let width = if req.width < MIN_SIZE { DEFAULT_WIDTH } else { req.width };
        let height = if req.height < MIN_SIZE { DEFAULT_HEIGHT } else { req.height };

        let out = build(&action, &spec, &dataset, DEFAULT_VIS_ID, width, height)?;
        let wiring = ControlWriter::new(CONTROLS_ID, CONTROL_FACTORY)
            .write(&out.controls)
            .map_err(|e| ServiceError::spec(&spec, e))?;
        let js = out.js + &wiring;

        Ok(write_page(&PageParts {
            title: action.title().unwrap_or(DEFAULT_TITLE),
            css: &out.css,
            js: &js,
            width,
            height,
            asset_base: req.asset_base.as_deref().unwrap_or(&self.asset_base),
            vis_id: DEFAULT_VIS_ID,
            controls_id: CONTROLS_ID,
        }))
    }

    /// Rewrite `spec` so it shows `new_ref` instead of the original data.
    ///
    /// The original data is `original_ref` when given, else the spec's own
    /// `data(...)` reference.
    pub async fn match_existing(
        &self,
        original_ref: Option<&str>,
        new_ref: Option<&str>,
        spec: Option<&str>,
    ) -> Result<String> {
        let spec = spec.ok_or(ServiceError::MissingParam("src"))?;
        let action = parse(spec)?;
        let original_ref = original_ref
            .or(action.data_ref())
            .ok_or(ServiceError::MissingParam("original_data"))?;
        let new_ref = new_ref.ok_or(ServiceError::MissingParam("new_data"))?;

        let original = self.data.get(original_ref).await.map_err(ServiceError::MatchData)?;
        let new = self.data.get(new_ref).await.map_err(ServiceError::MatchData)?;

        let retargeted = match_datasets(&original, &new, &action).map_err(ServiceError::Match)?;
        Ok(retargeted.to_string())
    }

    async fn load(&self, url: &str) -> Result<Dataset> {
        self.data.get(url).await.map_err(|source| ServiceError::ReadData {
            url: url.to_string(),
            source,
        })
    }
}

fn parse(spec: &str) -> Result<Action> {
    Action::parse(spec).map_err(|e| ServiceError::spec(spec, e))
}

fn build(
    action: &Action,
    spec: &str,
    dataset: &Dataset,
    vis_id: &str,
    width: i32,
    height: i32,
) -> Result<BuildOutput> {
    let item = action.apply(dataset).map_err(|e| ServiceError::spec(spec, e))?;
    D3Builder::new(vis_id)
        .build(&item, width, height)
        .map_err(|e| ServiceError::spec(spec, e))
}

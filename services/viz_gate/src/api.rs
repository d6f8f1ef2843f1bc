use crate::error::AppError;
use crate::service::{PageRequest, VisualizationResult};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RenderParams {
    pub src: Option<String>,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    pub visid: Option<String>,
}

/// `POST /interpret/d3`: CSV body, JSON `{js, css, controls}` back.
pub async fn create_visualization(
    State(state): State<AppState>,
    Query(p): Query<RenderParams>,
    body: String,
) -> Result<Json<VisualizationResult>, AppError> {
    let res = state
        .service
        .create_visualization(&body, p.src.as_deref(), p.width, p.height, p.visid.as_deref())
        .await?;
    Ok(Json(res))
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(alias = "src")]
    pub brunel_src: Option<String>,
    #[serde(alias = "url")]
    pub brunel_url: Option<String>,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    pub data: Option<String>,
    pub files: Option<String>,
}

/// `GET /interpret/d3`: full HTML page.
pub async fn create_page(
    State(state): State<AppState>,
    Query(p): Query<PageParams>,
) -> Result<Html<String>, AppError> {
    let html = state
        .service
        .create_page(PageRequest {
            spec: p.brunel_src,
            spec_url: p.brunel_url,
            width: p.width,
            height: p.height,
            data_url: p.data,
            asset_base: p.files,
        })
        .await?;
    Ok(Html(html))
}

#[derive(Debug, Deserialize)]
pub struct MatchParams {
    pub original_data: Option<String>,
    pub new_data: Option<String>,
    pub src: Option<String>,
}

/// `GET /interpret/match`: retargeted spec as plain text.
pub async fn match_existing(
    State(state): State<AppState>,
    Query(p): Query<MatchParams>,
) -> Result<String, AppError> {
    let spec = state
        .service
        .match_existing(
            p.original_data.as_deref(),
            p.new_data.as_deref(),
            p.src.as_deref(),
        )
        .await?;
    Ok(spec)
}

//! Browser binding for the zone engine. The map WebView passes the fetched
//! observation array as JSON and draws whatever comes back.

use anyhow::{Context, Result};
use blightmap_core::{AnalysisReport, EngineConfig, ObservationSet, TapResolution, ZoneEngine};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Timed<T> {
    #[serde(flatten)]
    body: T,
    elapsed_ms: f64,
}

/// Analyse an observation array.
///
/// `config_json` may be omitted for the default radii and severity order.
/// Returns `{ zones, edges, outbreakPolygon, bounds, summary, elapsedMs }`.
#[wasm_bindgen]
pub fn analyze(observations_json: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let started = js_sys::Date::now();
    let report = run_analysis(observations_json, config_json.as_deref()).map_err(to_js_error)?;
    to_js(&Timed { body: report, elapsed_ms: js_sys::Date::now() - started })
}

/// Resolve a tap on `selected_id`.
///
/// Returns `{ kind: "single", id }` or `{ kind: "cluster", observationIds }`.
#[wasm_bindgen(js_name = resolveTap)]
pub fn resolve_tap(observations_json: &str, selected_id: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let resolution = run_tap(observations_json, selected_id, config_json.as_deref()).map_err(to_js_error)?;
    to_js(&resolution)
}

fn engine_from(config_json: Option<&str>) -> Result<ZoneEngine> {
    let config = match config_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str::<EngineConfig>(json).context("invalid engine config")?
        }
        _ => EngineConfig::default(),
    };
    Ok(ZoneEngine::new(config)?)
}

fn run_analysis(observations_json: &str, config_json: Option<&str>) -> Result<AnalysisReport> {
    let engine = engine_from(config_json)?;
    let observations = ObservationSet::from_json(observations_json).context("invalid observations")?;
    Ok(engine.analyze(&observations))
}

fn run_tap(observations_json: &str, selected_id: &str, config_json: Option<&str>) -> Result<TapResolution> {
    let engine = engine_from(config_json)?;
    let observations = ObservationSet::from_json(observations_json).context("invalid observations")?;
    Ok(engine.resolve_tap(&observations, selected_id)?)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects rather than JS Maps, so the breakdown reads like JSON.
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("serialisation failed: {e}")))
}

fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

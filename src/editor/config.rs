use std::{fs::File, io::BufReader, path::Path};

use crate::{
    control::{mouse_shape::MouseShape, orbit::OrbitOptions},
    foundation::error::{StampError, StampResult},
    surface::context::CompositeOperation,
};

/// Where an effect layer takes its pixels from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSource {
    /// The result scene's latest frame.
    Result,
    /// An image file, relative to the asset root.
    Path(String),
}

/// One image of the effect scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectLayer {
    pub source: EffectSource,
    #[serde(default)]
    pub composite: CompositeOperation,
    #[serde(default)]
    pub index: i32,
}

impl EffectLayer {
    pub fn new(source: EffectSource, composite: CompositeOperation, index: i32) -> Self {
        Self {
            source,
            composite,
            index,
        }
    }
}

/// Editor setup: design backdrop, sizing ratios, controller options and the effect stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub design_src: String,
    pub design_index: i32,
    /// Design size as a fraction of the smaller edit-surface edge.
    pub design_ratio: f64,
    /// Width of a new layer as a fraction of the design size.
    pub layer_ratio: f64,
    /// Vertical offset of the result layers as a fraction of the effect width.
    pub result_offset_ratio: f64,
    pub orbit: OrbitOptions,
    pub mouse_shape: MouseShape,
    pub effect_layers: Vec<EffectLayer>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        use CompositeOperation as Op;
        let path = |p: &str| EffectSource::Path(p.to_owned());
        Self {
            design_src: "design.png".to_owned(),
            design_index: 1000,
            design_ratio: 0.5,
            layer_ratio: 0.5,
            result_offset_ratio: 0.12,
            orbit: OrbitOptions::default(),
            mouse_shape: MouseShape::default(),
            effect_layers: vec![
                EffectLayer::new(EffectSource::Result, Op::SourceOver, 0),
                EffectLayer::new(path("shirt-mask.png"), Op::DestinationIn, 1),
                EffectLayer::new(path("shirt-shadow.png"), Op::Multiply, 2),
                EffectLayer::new(EffectSource::Result, Op::DestinationIn, 3),
                EffectLayer::new(path("shirt-origin.jpg"), Op::DestinationOver, 4),
                EffectLayer::new(path("shirt-noPattern.png"), Op::SourceOver, 5),
            ],
        }
    }
}

impl EditorConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> StampResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StampError::validation(format!("parse editor config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> StampResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StampError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> StampResult<()> {
        validate_rel_source(&self.design_src, "design_src")?;
        for (name, value) in [
            ("design_ratio", self.design_ratio),
            ("layer_ratio", self.layer_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StampError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.result_offset_ratio.is_finite() {
            return Err(StampError::validation("result_offset_ratio must be finite"));
        }
        self.orbit.validate()?;
        self.mouse_shape.validate()?;

        for (i, layer) in self.effect_layers.iter().enumerate() {
            if let EffectSource::Path(p) = &layer.source {
                validate_rel_source(p, &format!("effect_layers[{i}].source.path"))?;
            }
        }
        Ok(())
    }
}

fn validate_rel_source(source: &str, field: &str) -> StampResult<()> {
    if source.trim().is_empty() {
        return Err(StampError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StampError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(StampError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/editor/config.rs"]
mod tests;

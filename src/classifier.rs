use std::path::Path;

use tract_onnx::prelude::*;

use crate::preprocess::{INPUT_HEIGHT, INPUT_WIDTH};

/// Waste categories, in model output order.
///
/// Index `i` of the probability vector corresponds to variant `i`.
/// The order is a contract with the trained artifact and must only
/// change together with a retrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasteClass {
    AluminumCans,
    Cardboard,
    GlassBottles,
    HdpeContainers,
    PetBottles,
}

impl WasteClass {
    pub const ALL: [WasteClass; 5] = [
        WasteClass::AluminumCans,
        WasteClass::Cardboard,
        WasteClass::GlassBottles,
        WasteClass::HdpeContainers,
        WasteClass::PetBottles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteClass::AluminumCans => "Aluminum_Cans",
            WasteClass::Cardboard => "Cardboard",
            WasteClass::GlassBottles => "Glass_Bottles",
            WasteClass::HdpeContainers => "HDPE_Containers",
            WasteClass::PetBottles => "PET_Bottles",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: WasteClass,
    pub confidence: f32,
}

/// Seam around the trained artifact: a function from input tensor to
/// probability vector, one entry per `WasteClass`. Tests substitute a
/// constant implementation.
pub trait ImageModel: Send + Sync {
    fn run(&self, input: &tract_ndarray::Array4<f32>) -> anyhow::Result<Vec<f32>>;
}

pub struct TractModel {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
}

impl TractModel {
    pub fn load(path: &Path) -> TractResult<Self> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, 3),
                ),
            )?
            .into_optimized()?
            .into_runnable()?;
        Ok(Self { plan })
    }
}

impl ImageModel for TractModel {
    fn run(&self, input: &tract_ndarray::Array4<f32>) -> anyhow::Result<Vec<f32>> {
        let outputs = self.plan.run(tvec!(input.clone().into_tensor().into_tvalue()))?;
        let scores = outputs[0].to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

/// Fixed-output model for exercising the service without an artifact.
#[cfg(test)]
pub struct ConstModel(pub Vec<f32>);

#[cfg(test)]
impl ImageModel for ConstModel {
    fn run(&self, _input: &tract_ndarray::Array4<f32>) -> anyhow::Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

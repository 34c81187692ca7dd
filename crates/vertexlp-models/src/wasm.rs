//! WASM bindings for the planning models
//!
//! Every function takes a plain JS object of parameters (missing fields fall
//! back to the defaults) and returns the result as a JS object.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use vertexlp_solver::{Estimate, SimulationDelta, SimulationOutcome, Simulator, SweepPoint};

use crate::investment::InvestmentParams;
use crate::product_mix::ProductMixParams;
use crate::production::{PlanningStrategy, ProductionParams};
use crate::solar::SolarParams;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `undefined` and `null` mean "all defaults"
fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

/// Best split of the capital between the two investments
#[wasm_bindgen]
pub fn solve_investment(params_js: JsValue) -> Result<JsValue, JsValue> {
    let params: InvestmentParams = from_js(params_js)?;
    let plan = params.solve().map_err(to_js_error)?;
    to_js(&plan)
}

/// Chairs and tables plan; `strategy` is `"vertex"` or `"baseline"`
#[wasm_bindgen]
pub fn plan_production(params_js: JsValue, strategy: Option<String>) -> Result<JsValue, JsValue> {
    let params: ProductionParams = from_js(params_js)?;
    let strategy = match strategy {
        Some(s) => s.parse::<PlanningStrategy>().map_err(to_js_error)?,
        None => PlanningStrategy::default(),
    };
    let plan = params.plan(strategy).map_err(to_js_error)?;
    to_js(&plan)
}

#[wasm_bindgen]
pub fn solve_solar(params_js: JsValue) -> Result<JsValue, JsValue> {
    let params: SolarParams = from_js(params_js)?;
    let plan = params.solve().map_err(to_js_error)?;
    to_js(&plan)
}

/// Solution and sensitivity report, plus plot data
#[wasm_bindgen]
pub fn analyze_product_mix(params_js: JsValue, exact: bool) -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    struct Response {
        #[serde(flatten)]
        report: crate::product_mix::ProductMixReport,
        plot: crate::product_mix::PlotData,
    }

    let params: ProductMixParams = from_js(params_js)?;
    let estimate = if exact { Estimate::Exact } else { Estimate::Heuristic };
    let report = params.analyze(estimate).map_err(to_js_error)?;
    let plot = params.plot_data(&report.solution);
    to_js(&Response { report, plot })
}

/// New objective value at the current optimum after changing the profits,
/// with the profit sweep around that optimum
#[wasm_bindgen]
pub fn simulate_product_mix(params_js: JsValue, delta_js: JsValue) -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    struct Response {
        #[serde(flatten)]
        outcome: SimulationOutcome,
        sweep: Vec<SweepPoint>,
    }

    let params: ProductMixParams = from_js(params_js)?;
    let delta: SimulationDelta = from_js(delta_js)?;
    let solution = params.solve().map_err(to_js_error)?;
    let outcome = Simulator::new(&params.problem(), &solution).evaluate(&delta);
    let sweep = params.sweep(&solution);
    to_js(&Response { outcome, sweep })
}

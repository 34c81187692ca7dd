mod error;
pub mod investment;
pub mod product_mix;
pub mod production;
pub mod solar;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::ModelError;
pub use investment::{InvestmentParams, InvestmentPlan, LimitingConstraint};
pub use product_mix::{PlotData, ProductMixParams, ProductMixReport};
pub use production::{PlanningStrategy, ProductionParams, ProductionPlan, ResourceAmounts};
pub use solar::{PanelSpec, SolarParams, SolarPlan};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_partial_params_fill_in_defaults() {
        let params: InvestmentParams = serde_json::from_str(r#"{ "min_return": 1500 }"#).unwrap();
        assert_eq!(params.min_return, 1500.0);
        assert_eq!(params.total_capital, 100_000.0);

        let params: ProductionParams = serde_json::from_str(r#"{ "chair_profit": 80 }"#).unwrap();
        assert_eq!(params.available, ProductionParams::default().available);
    }

    #[test]
    fn test_strategy_and_limiting_names() {
        let strategy: PlanningStrategy = serde_json::from_str(r#""baseline_scaling""#).unwrap();
        assert_eq!(strategy, PlanningStrategy::BaselineScaling);
        assert_eq!(
            serde_json::to_string(&LimitingConstraint::MinReturn).unwrap(),
            r#""min_return""#
        );
    }

    #[test]
    fn test_plan_serializes() {
        let plan = SolarParams::default().solve().unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["profit"], 48_000.0);
        assert_eq!(json["solution"]["optimal_point"]["x"], 160.0);
    }
}

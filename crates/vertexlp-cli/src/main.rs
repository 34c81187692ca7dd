use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use vertexlp_models::product_mix::SWEEP_STEPS;
use vertexlp_models::{
    InvestmentParams, InvestmentPlan, LimitingConstraint, ModelError, PlanningStrategy, ProductMixParams,
    ProductMixReport, ProductionParams, ProductionPlan, SolarParams, SolarPlan,
};
use vertexlp_solver::{Estimate, SimulationDelta, SimulationOutcome, SolveError, SweepPoint};

mod params;

#[derive(Parser)]
#[command(name = "vertexlp")]
#[command(about = "Two-variable linear programs solved by vertex enumeration", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a capital between a low-risk and a high-risk investment
    Invest {
        /// JSON parameter file; missing fields take the defaults
        #[arg(short, long)]
        params: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
    /// Plan chairs and tables for the workshop
    Production {
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// vertex or baseline
        #[arg(short, long, default_value = "vertex")]
        strategy: PlanningStrategy,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
    /// Standard versus premium solar panels
    Solar {
        #[arg(short, long)]
        params: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
    /// Product mix with sensitivity analysis and a what-if run
    Mix {
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// Read shadow prices and ranges off the optimal basis instead of estimating them
        #[arg(long)]
        exact: bool,
        /// Change to the first profit for the what-if run
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        delta_c1: f64,
        /// Change to the second profit for the what-if run
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        delta_c2: f64,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        match e.downcast_ref::<ModelError>() {
            Some(ModelError::Solve(SolveError::Infeasible { violations })) => {
                println!("Status: INFEASIBLE");
                println!("No plan satisfies all constraints.");
                for v in violations {
                    println!("  - {}", v.description);
                }
            }
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Invest { params, format } => {
            let params: InvestmentParams = params::load(params.as_deref())?;
            let plan = params.solve()?;
            emit(format, &plan, || print_investment(&params, &plan))
        }
        Commands::Production {
            params,
            strategy,
            format,
        } => {
            let params: ProductionParams = params::load(params.as_deref())?;
            let plan = params.plan(strategy)?;
            emit(format, &plan, || print_production(&plan))
        }
        Commands::Solar { params, format } => {
            let params: SolarParams = params::load(params.as_deref())?;
            let plan = params.solve()?;
            emit(format, &plan, || print_solar(&plan))
        }
        Commands::Mix {
            params,
            exact,
            delta_c1,
            delta_c2,
            format,
        } => {
            let params: ProductMixParams = params::load(params.as_deref())?;
            let estimate = if exact { Estimate::Exact } else { Estimate::Heuristic };
            let report = params.analyze(estimate)?;
            let what_if = (delta_c1 != 0.0 || delta_c2 != 0.0)
                .then(|| params.simulate(&SimulationDelta::objective(delta_c1, delta_c2)))
                .transpose()?;
            let sweep = params.sweep(&report.solution);

            #[derive(Serialize)]
            struct MixOutput<'a> {
                #[serde(flatten)]
                report: &'a ProductMixReport,
                what_if: Option<SimulationOutcome>,
                sweep: &'a [SweepPoint],
            }
            let output = MixOutput {
                report: &report,
                what_if,
                sweep: &sweep,
            };
            emit(format, &output, || print_mix(&params, &report, what_if.as_ref(), &sweep))
        }
    }
}

fn emit<T: Serialize>(format: Format, value: &T, pretty: impl FnOnce()) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Pretty => pretty(),
    }
    Ok(())
}

fn print_investment(params: &InvestmentParams, plan: &InvestmentPlan) {
    println!("Status: OPTIMAL");
    println!("Capital: {:.2}", params.total_capital);
    println!();
    println!("Allocation:");
    println!("  {:20} {:12.2} ({:5.2}%)", "low risk", plan.allocation[0], plan.shares[0]);
    println!("  {:20} {:12.2} ({:5.2}%)", "high risk", plan.allocation[1], plan.shares[1]);
    println!();
    println!("Expected return: {:.2} ({:.2}% of capital)", plan.total_return, plan.return_percentage);
    println!("Portfolio risk:  {:.2}%", plan.portfolio_risk * 100.0);
    let limiting = match plan.limiting {
        LimitingConstraint::Capital => "available capital",
        LimitingConstraint::Risk => "maximum risk",
        LimitingConstraint::MinReturn => "minimum return",
    };
    println!("Limited by:      {}", limiting);
}

fn print_production(plan: &ProductionPlan) {
    println!("Strategy: {}", plan.strategy);
    println!("Chairs: {}", plan.chairs);
    println!("Tables: {}", plan.tables);
    println!("Total profit: {:.2}", plan.total_profit);
    println!();
    println!("Resources:");
    for r in &plan.utilization {
        println!(
            "  {:12} {:10.2} of {:10.2} ({:6.2}%)",
            r.name, r.usage, r.available, r.percentage
        );
    }
    if !plan.bottlenecks.is_empty() {
        println!();
        println!("Bottlenecks: {}", plan.bottlenecks.join(", "));
    }
    if !plan.overused.is_empty() {
        println!("Overused:    {}", plan.overused.join(", "));
    }
    println!();
    let label = match plan.estimate {
        Estimate::Heuristic => "Shadow prices (estimated):",
        Estimate::Exact => "Shadow prices:",
    };
    println!("{}", label);
    for sp in &plan.shadow_prices {
        println!("  {:12} {:10.4}", sp.constraint, sp.value);
    }
}

fn print_solar(plan: &SolarPlan) {
    println!("Status: OPTIMAL");
    println!("Standard panels: {:.2}", plan.standard_panels);
    println!("Premium panels:  {:.2}", plan.premium_panels);
    println!("Profit:          {:.2}", plan.profit);
    println!();
    println!("Material used: {:.2}", plan.material_used);
    println!("Labor used:    {:.2}", plan.labor_used);
    println!("Emissions:     {:.2}", plan.emissions);
}

fn print_mix(
    params: &ProductMixParams,
    report: &ProductMixReport,
    what_if: Option<&SimulationOutcome>,
    sweep: &[SweepPoint],
) {
    let solution = &report.solution;
    let analysis = &report.analysis;
    let problem = params.problem();

    println!("Status: OPTIMAL");
    println!("Total profit: {:.2}", solution.objective_value);
    println!();
    println!("Production:");
    println!("  {:20} {:10.2}", problem.variables[0], solution.optimal_point.x);
    println!("  {:20} {:10.2}", problem.variables[1], solution.optimal_point.y);
    println!();

    if !analysis.binding_constraints.is_empty() {
        println!("Binding constraints:");
        for name in &analysis.binding_constraints {
            println!("  - {}", name);
        }
        println!();
    }

    println!("Shadow prices:");
    for sp in &analysis.shadow_prices {
        println!("  {:20} {:10.4}", sp.constraint, sp.value);
        println!("    {}", sp.interpretation);
    }
    println!();

    println!("Profit ranges:");
    for range in &analysis.objective_sensitivity {
        println!(
            "  {:20} {:10.2} in [{:.2}, {:.2}]",
            range.name, range.current, range.lower_bound, range.upper_bound
        );
    }
    println!();

    println!("Resources:");
    for r in &analysis.resources {
        println!(
            "  {:20} {:10.2} of {:10.2} ({:6.2}%), {:.2} left",
            r.name, r.usage, r.available, r.percentage, r.remaining
        );
    }

    if !analysis.reduced_costs.is_empty() {
        println!();
        println!("Reduced costs:");
        for rc in &analysis.reduced_costs {
            if !rc.is_basic && rc.reduced_cost.abs() > 0.001 {
                println!(
                    "  {:20} profit must rise by {:.2} to enter the plan",
                    rc.variable, -rc.reduced_cost
                );
            }
        }
    }

    if let Some(outcome) = what_if {
        println!();
        println!("What-if:");
        println!("  New profit: {:.2}", outcome.new_objective_value);
        println!("  Difference: {:+.2}", outcome.difference);
    }

    // every fifth step keeps the table short; --format json has all of them
    println!();
    println!("Profit sweep (plan held fixed):");
    for per_variable in sweep.chunks(2 * SWEEP_STEPS as usize + 1) {
        for point in per_variable.iter().step_by(5) {
            println!(
                "  {:20} {:10.2} -> {:10.2}",
                problem.variables[point.variable], point.coefficient, point.objective_value
            );
        }
    }
}

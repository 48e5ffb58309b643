use std::time::Instant;

use log::info;

use planner_core::{PlannerOptions, Result, logging, search, write_report_to};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = PlannerOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let env = options.environment()?;
    let spec = options.hardware()?;
    info!("hardware: {spec}");

    let outcome = search(env, spec, options.search_settings())?;
    write_report_to(&outcome, options.output_path())?;

    info!(
        "output: feasible={} time={:.2}s",
        outcome.is_feasible(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

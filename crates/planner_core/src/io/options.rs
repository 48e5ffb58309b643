use std::{env, path::Path};

use log::LevelFilter;
use planner_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    AntColonyParams, Environment, Error, GeneticParams, HardwareSpec, Result, SearchSettings,
    TspSolver, TspStrategy,
};

/// Everything the `coverage-planner` binary can be told on the command line.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct PlannerOptions {
    /// Environment extent along x, in grid units.
    #[cli(long = "width")]
    pub width: usize,
    /// Environment extent along y, in grid units.
    #[cli(long = "height")]
    pub height: usize,
    /// Number of UAVs sharing each cell.
    #[cli(long = "uav-count")]
    pub uav_count: usize,
    /// Number of UGVs. Must stay 1.
    #[cli(long = "ugv-count")]
    pub ugv_count: usize,
    /// UAV cruise speed.
    #[cli(long = "uav-max-speed")]
    pub uav_max_speed: f64,
    /// UGV speed between cell midpoints.
    #[cli(long = "ugv-max-speed")]
    pub ugv_max_speed: f64,
    /// UAV battery capacity.
    #[cli(long = "uav-max-energy")]
    pub uav_max_energy: f64,
    /// Energy burned per unit of flight time.
    #[cli(long = "uav-depletion-rate")]
    pub uav_depletion_rate: f64,
    /// Energy regained per unit of charging time. Reported only.
    #[cli(long = "uav-charge-rate")]
    pub uav_charge_rate: f64,
    /// Side of the UAV detection footprint. Reported only.
    #[cli(long = "detection-footprint")]
    pub detection_footprint: f64,
    /// Solver for UAV sector tours: `exact`, `ant-colony` or `genetic`.
    #[cli(long = "uav-solver", parse_with = "TspStrategy::parse")]
    pub uav_solver: TspStrategy,
    /// Solver for the UGV tour over cell midpoints.
    #[cli(long = "ugv-solver", parse_with = "TspStrategy::parse")]
    pub ugv_solver: TspStrategy,
    /// Base seed; every candidate size derives its own stream from it.
    #[cli(long = "seed")]
    pub seed: u64,
    /// Largest cell area tried. 0 means uncapped.
    #[cli(long = "max-cell-area")]
    pub max_cell_area: usize,
    /// Worker threads. 0 means one per available core.
    #[cli(long = "threads")]
    pub threads: usize,
    /// Ant colony iterations.
    #[cli(long = "aco-iterations")]
    pub aco_iterations: usize,
    /// Ants released per iteration.
    #[cli(long = "aco-ants")]
    pub aco_ants: usize,
    /// Global pheromone decay.
    #[cli(long = "aco-decay")]
    pub aco_decay: f64,
    /// Exponent on inverse distance.
    #[cli(long = "aco-heuristic")]
    pub aco_heuristic: f64,
    /// Local pheromone update rate.
    #[cli(long = "aco-local-pheromone")]
    pub aco_local_pheromone: f64,
    /// Probability of a greedy step.
    #[cli(long = "aco-greed")]
    pub aco_greed: f64,
    /// Genetic population size.
    #[cli(long = "ga-population")]
    pub ga_population: usize,
    /// Individuals carried over unchanged.
    #[cli(long = "ga-elite")]
    pub ga_elite: usize,
    /// Per-gene swap probability.
    #[cli(long = "ga-mutation-rate")]
    pub ga_mutation_rate: f64,
    /// Generations to evolve.
    #[cli(long = "ga-generations")]
    pub ga_generations: usize,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    #[kv(debug)]
    pub log_output: String,
    /// Optional output file path for the plan report. Empty means stdout.
    #[cli(long = "output")]
    #[kv(debug)]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        let hardware = HardwareSpec::default();
        let settings = SearchSettings::default();
        let aco = AntColonyParams::default();
        let ga = GeneticParams::default();

        Self {
            width: 12,
            height: 12,
            uav_count: hardware.uav_count,
            ugv_count: hardware.ugv_count,
            uav_max_speed: hardware.uav_max_speed,
            ugv_max_speed: hardware.ugv_max_speed,
            uav_max_energy: hardware.uav_max_energy,
            uav_depletion_rate: hardware.uav_depletion_rate,
            uav_charge_rate: hardware.uav_charge_rate,
            detection_footprint: hardware.detection_footprint,
            uav_solver: settings.uav_solver.strategy,
            ugv_solver: settings.ugv_solver.strategy,
            seed: settings.seed,
            max_cell_area: settings.max_cell_area.unwrap_or(0),
            threads: settings.threads,
            aco_iterations: aco.max_iterations,
            aco_ants: aco.num_ants,
            aco_decay: aco.decay,
            aco_heuristic: aco.heuristic_weight,
            aco_local_pheromone: aco.local_pheromone,
            aco_greed: aco.greed,
            ga_population: ga.population_size,
            ga_elite: ga.elite_size,
            ga_mutation_rate: ga.mutation_rate,
            ga_generations: ga.generations,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            output: String::new(),
        }
    }
}

impl PlannerOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_config(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_config(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_config(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);

            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_config(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  coverage-planner [options]\n\n",
                "Options:\n",
                "{}",
                "  --help\n",
                "\n",
                "Examples:\n",
                "  coverage-planner --width 20 --height 14 --log-level info\n",
                "  coverage-planner --uav-solver ant-colony --max-cell-area 0 --output plan.txt\n",
                "  coverage-planner --uav-count 2 --uav-max-energy 25 --seed 7\n",
            ),
            Self::cli_usage()
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        let log_output = self.log_output.trim();
        if log_output.is_empty() || log_output == "-" {
            None
        } else {
            Some(Path::new(log_output))
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        let output = self.output.trim();
        if output.is_empty() || output == "-" {
            None
        } else {
            Some(Path::new(output))
        }
    }

    pub fn environment(&self) -> Result<Environment> {
        Environment::new(self.width, self.height)
    }

    pub fn hardware(&self) -> Result<HardwareSpec> {
        let spec = HardwareSpec {
            uav_max_speed: self.uav_max_speed,
            ugv_max_speed: self.ugv_max_speed,
            uav_max_energy: self.uav_max_energy,
            uav_depletion_rate: self.uav_depletion_rate,
            uav_charge_rate: self.uav_charge_rate,
            detection_footprint: self.detection_footprint,
            uav_count: self.uav_count,
            ugv_count: self.ugv_count,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn search_settings(&self) -> SearchSettings {
        let ant_colony = AntColonyParams {
            max_iterations: self.aco_iterations,
            num_ants: self.aco_ants,
            decay: self.aco_decay,
            heuristic_weight: self.aco_heuristic,
            local_pheromone: self.aco_local_pheromone,
            greed: self.aco_greed,
        };
        let genetic = GeneticParams {
            population_size: self.ga_population,
            elite_size: self.ga_elite,
            mutation_rate: self.ga_mutation_rate,
            generations: self.ga_generations,
        };
        let solver = |strategy| {
            TspSolver::new(strategy)
                .with_ant_colony(ant_colony)
                .with_genetic(genetic)
        };

        SearchSettings {
            uav_solver: solver(self.uav_solver),
            ugv_solver: solver(self.ugv_solver),
            seed: self.seed,
            max_cell_area: (self.max_cell_area > 0).then_some(self.max_cell_area),
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{LogFormat, LogLevel, PlannerOptions};
    use crate::{Error, TspStrategy};

    #[test]
    fn log_timestamp_accepts_common_booleans() {
        for (raw, expected) in [("true", true), ("ON", true), ("0", false), ("no", false)] {
            let options = PlannerOptions::parse_from_iter([format!("--log-timestamp={raw}")])
                .expect("parse options");
            assert_eq!(options.log_timestamp, expected, "raw={raw}");
        }

        let options = PlannerOptions::parse_from_iter(["--no-log-timestamp", "--log-timestamp"])
            .expect("parse options");
        assert!(options.log_timestamp);
    }

    #[test]
    fn log_timestamp_rejects_unknown_values() {
        let err = PlannerOptions::parse_from_iter(["--log-timestamp=maybe"])
            .expect_err("invalid bool should fail");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --log-timestamp: maybe")
        );
    }

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::Trace);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::parse("warning").expect("alias"), LogLevel::Warn);
    }

    #[test]
    fn parse_from_iter_applies_known_cli_options() {
        let options = PlannerOptions::parse_from_iter([
            "--width=20",
            "--height",
            "14",
            "--uav-count=2",
            "--uav-max-energy=25.5",
            "--uav-depletion-rate=0.5",
            "--uav-solver=aco",
            "--ugv-solver=genetic",
            "--seed=7",
            "--max-cell-area=0",
            "--threads=3",
            "--aco-iterations=40",
            "--ga-generations=60",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
            "--output=plan.txt",
        ])
        .expect("parse options");

        assert_eq!((options.width, options.height), (20, 14));
        assert_eq!(options.uav_count, 2);
        assert_eq!(options.uav_max_energy, 25.5);
        assert_eq!(options.uav_depletion_rate, 0.5);
        assert_eq!(options.uav_solver, TspStrategy::AntColony);
        assert_eq!(options.ugv_solver, TspStrategy::Genetic);
        assert_eq!(options.seed, 7);
        assert_eq!(options.max_cell_area, 0);
        assert_eq!(options.threads, 3);
        assert_eq!(options.aco_iterations, 40);
        assert_eq!(options.ga_generations, 60);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
        assert_eq!(options.output, "plan.txt");
    }

    #[test]
    fn search_settings_carry_solver_tuning() {
        let options = PlannerOptions::parse_from_iter([
            "--uav-solver=ant-colony",
            "--aco-ants=3",
            "--ga-elite=5",
            "--max-cell-area=0",
        ])
        .expect("parse options");
        let settings = options.search_settings();

        assert_eq!(settings.uav_solver.strategy, TspStrategy::AntColony);
        assert_eq!(settings.uav_solver.ant_colony.num_ants, 3);
        assert_eq!(settings.ugv_solver.genetic.elite_size, 5);
        assert_eq!(settings.max_cell_area, None);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let options = PlannerOptions::default();
        let settings = options.search_settings();
        assert_eq!(settings.uav_solver.strategy, TspStrategy::Exact);
        assert_eq!(settings.ugv_solver.strategy, TspStrategy::AntColony);
        assert_eq!(settings.max_cell_area, Some(16));
        assert_eq!(settings.seed, 12_345);
        assert_eq!(options.hardware().expect("hardware").uav_count, 4);
    }

    #[test]
    fn hardware_rejects_invalid_values() {
        let options = PlannerOptions {
            uav_max_speed: 0.0,
            ..PlannerOptions::default()
        };
        assert!(matches!(options.hardware(), Err(Error::InvalidConfig(_))));

        let options = PlannerOptions {
            ugv_count: 2,
            ..PlannerOptions::default()
        };
        assert!(matches!(options.hardware(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn environment_rejects_zero_extent() {
        let options = PlannerOptions {
            width: 0,
            ..PlannerOptions::default()
        };
        assert!(matches!(options.environment(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn parse_from_iter_accepts_no_log_timestamp_flag() {
        let options =
            PlannerOptions::parse_from_iter(["--no-log-timestamp"]).expect("parse options");
        assert!(!options.log_timestamp);
    }

    #[test]
    fn parse_from_iter_rejects_no_log_timestamp_with_value() {
        let err = PlannerOptions::parse_from_iter(["--no-log-timestamp=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = PlannerOptions::parse_from_iter(["--unknown-opt=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));
    }

    #[test]
    fn parse_from_iter_rejects_bad_values() {
        let err = PlannerOptions::parse_from_iter(["--width=wide"]).expect_err("bad usize");
        assert!(err.to_string().contains("Invalid value for --width: wide"));

        let err = PlannerOptions::parse_from_iter(["--uav-solver=lkh"]).expect_err("bad solver");
        assert!(err.to_string().contains("expected exact|ant-colony|genetic"));
    }

    #[test]
    fn parse_from_iter_requires_value() {
        let err = PlannerOptions::parse_from_iter(["--seed"]).expect_err("missing value");
        assert!(err.to_string().contains("Missing value for --seed"));
    }

    #[test]
    fn parse_from_iter_rejects_positional_argument() {
        let err = PlannerOptions::parse_from_iter(["12"]).expect_err("expected positional error");
        assert!(err.to_string().contains("Unexpected argument: 12"));
    }

    #[test]
    fn usage_lists_every_option_with_hints() {
        let usage = PlannerOptions::usage();
        assert!(usage.contains("--width <usize>"));
        assert!(usage.contains("--uav-max-energy <f64>"));
        assert!(usage.contains("--uav-solver <exact|ant-colony|genetic>"));
        assert!(usage.contains("--log-level <error|warn|info|debug|trace|off>"));
        assert!(usage.contains("--log-timestamp[=<bool>]"));
        assert!(usage.contains("--no-log-timestamp"));
        assert!(usage.contains("--output <path>"));
        assert!(usage.contains("UAV battery capacity."));
    }

    #[test]
    fn parse_from_iter_help_returns_usage_error() {
        let err =
            PlannerOptions::parse_from_iter(["--help"]).expect_err("help should short-circuit");
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn display_lists_fields_with_quoted_paths() {
        let text = PlannerOptions::default().to_string();
        assert!(text.contains("\twidth "));
        assert!(text.contains("uav_solver"));
        assert!(text.contains("= exact"));
        assert!(text.contains("= \"\""));
    }

    #[test]
    fn paths_treat_empty_and_dash_as_stdio() {
        let options = PlannerOptions::default();
        assert!(options.output_path().is_none());
        assert!(options.log_output_path().is_none());

        let options = PlannerOptions {
            output: "-".to_string(),
            log_output: "out/run.log".to_string(),
            ..PlannerOptions::default()
        };
        assert!(options.output_path().is_none());
        assert_eq!(
            options.log_output_path().expect("path should exist"),
            std::path::Path::new("out/run.log")
        );
    }
}

pub mod config;
pub mod job;
pub mod kernel;
pub mod parallel;
pub mod result;
pub mod runner;
pub mod setup;

pub use config::{BalancingMode, Configuration, Mode, Options};
pub use job::SharedSetup;
pub use kernel::{prepare_simulation, run_simulation};
pub use parallel::ParallelRunner;
pub use result::{BattleSample, ClassResult, FightResult, ResultList, Statistic, UnitResult, WeightedRange};
pub use runner::{RunLimit, Runner, SerialRunner, Stopper, new_stopper};
pub use setup::{SimPlanet, SimShip, Setup};

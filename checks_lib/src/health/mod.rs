//! Health checks reported to the monitoring service

pub mod checks;
pub mod result;
pub mod runner;
pub mod sources;
pub mod threshold;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;

pub use result::{CheckResult, CheckStatus, Verdict};
pub use runner::{CheckReport, CheckRunner};

/// A single verification of one subsystem.
///
/// `run` reads the check's collaborators and always produces a fully
/// populated result; collaborator failures become a failed or degraded
/// verdict instead of an error.
pub trait Check: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self) -> CheckResult;
}

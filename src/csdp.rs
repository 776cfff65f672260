//! Running the CSDP solver on SDPA files.

use crate::Error;
use crate::sdpa::{SdpaProblem, SdpaSolution};
use log::*;
use std::fmt;
use std::fs;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Outcome reported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationStatus {
    /// The program was solved.
    Optimal,
    /// The primal program is infeasible: no certificate exists.
    Infeasible,
    DualInfeasible,
    /// Solved to a lower accuracy than requested.
    AlmostOptimal,
    IterationLimit,
    /// The solver stopped on numerical trouble; holds its exit code.
    NumericalError(i32),
    /// The solver binary could not be started.
    SolverUnavailable,
    Unknown(i32),
}

use TerminationStatus::*;

impl TerminationStatus {
    /// Map an exit code of csdp.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Optimal,
            1 => Infeasible,
            2 => DualInfeasible,
            3 => AlmostOptimal,
            4 => IterationLimit,
            5..=9 => NumericalError(code),
            _ => Unknown(code),
        }
    }
    /// Whether the solver produced a usable certificate.
    pub fn is_success(&self) -> bool {
        matches!(self, Optimal | AlmostOptimal)
    }
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Optimal => write!(f, "OPTIMAL"),
            Infeasible => write!(f, "INFEASIBLE"),
            DualInfeasible => write!(f, "DUAL_INFEASIBLE"),
            AlmostOptimal => write!(f, "ALMOST_OPTIMAL"),
            IterationLimit => write!(f, "ITERATION_LIMIT"),
            NumericalError(c) => write!(f, "NUMERICAL_ERROR (code {c})"),
            SolverUnavailable => write!(f, "SOLVER_UNAVAILABLE"),
            Unknown(c) => write!(f, "UNKNOWN (code {c})"),
        }
    }
}

/// Options of the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Name or path of the csdp executable.
    pub binary: PathBuf,
    /// `printlevel` of csdp: 0 is silent, 1 prints the iterations.
    pub verbosity: u32,
    /// Directory for the problem and solution files.
    /// A temporary directory is used when `None`.
    pub work_dir: Option<PathBuf>,
    /// Keep the temporary directory after solving.
    pub keep_files: bool,
    /// After this delay, iteration lines are logged at `info` level.
    pub stream_after: Duration,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("csdp"),
            verbosity: 1,
            work_dir: None,
            keep_files: false,
            stream_after: Duration::from_secs(2),
        }
    }
}

/// What a run of the solver produced.
#[derive(Debug, Clone)]
pub struct SolverOutput {
    pub status: TerminationStatus,
    /// The solution file, when the solver wrote one.
    pub solution: Option<SdpaSolution>,
}

impl SolverOutput {
    fn unavailable() -> Self {
        Self {
            status: SolverUnavailable,
            solution: None,
        }
    }
}

/// Handle on the csdp executable.
#[derive(Debug, Clone, Default)]
pub struct Csdp {
    pub settings: SolverSettings,
}

impl Csdp {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
    pub fn verbosity(mut self, level: u32) -> Self {
        self.settings.verbosity = level;
        self
    }
    /// Write `problem` as `name.sdpa` and solve it.
    pub fn solve(&self, problem: &SdpaProblem, name: &str) -> Result<SolverOutput, Error> {
        match &self.settings.work_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                self.solve_in(dir, problem, name)
            }
            None => {
                let dir = tempfile::Builder::new().prefix("sos-").tempdir()?;
                let res = self.solve_in(dir.path(), problem, name);
                if self.settings.keep_files {
                    info!("Keeping solver files in {}", dir.keep().display());
                }
                res
            }
        }
    }
    fn solve_in(&self, dir: &Path, problem: &SdpaProblem, name: &str) -> Result<SolverOutput, Error> {
        // csdp runs inside `dir` and gets paths relative to it
        let problem_name = format!("{name}.sdpa");
        let solution_name = format!("{name}.sol");
        let solution_file = dir.join(&solution_name);
        problem.write(&dir.join(&problem_name))?;
        self.write_params(dir)?;
        debug!(
            "SDP with {} constraints and blocks {:?}",
            problem.dim(),
            problem.block_sizes
        );
        let mut command = Command::new(&self.settings.binary);
        command
            .arg(&problem_name)
            .arg(&solution_name)
            .current_dir(dir)
            .stdout(Stdio::piped());
        info!("Calling CSDP");
        debug!("command: {:?}", command);
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Cannot find {}: {}", self.settings.binary.display(), e);
                return Ok(SolverOutput::unavailable());
            }
            Err(e) => return Err(e.into()),
        };
        let mut printed_value = None;
        if let Some(stdout) = child.stdout.take() {
            printed_value = self.follow_output(BufReader::new(stdout))?;
        }
        let status = match child.wait()?.code() {
            Some(code) => TerminationStatus::from_code(code),
            None => Unknown(-1),
        };
        match printed_value {
            Some(v) => info!("CSDP returned {} with primal value {}", status, v),
            None => info!("CSDP returned {}", status),
        }
        let solution = if status.is_success() && solution_file.exists() {
            Some(SdpaSolution::load(&solution_file)?)
        } else {
            None
        };
        Ok(SolverOutput { status, solution })
    }
    /// Log the output of csdp and extract the primal objective value, which
    /// is only printed when `verbosity` is positive.
    fn follow_output<R: BufRead>(&self, output: R) -> Result<Option<f64>, Error> {
        let time_start = Instant::now();
        let mut stream = false;
        let mut value = None;
        for line in output.lines() {
            let line = line?;
            if line.starts_with("Iter") {
                if !stream && time_start.elapsed() > self.settings.stream_after {
                    stream = true;
                    info!(
                        "csdp is taking more than {}s, start streaming output",
                        self.settings.stream_after.as_secs_f32()
                    )
                }
                if stream {
                    info!("{}", line)
                } else {
                    debug!("{}", line)
                }
            } else if let Some(rest) = line.strip_prefix("Primal objective value:") {
                value = Some(rest.trim().parse()?);
            } else if !line.trim().is_empty() {
                debug!("{}", line)
            }
        }
        Ok(value)
    }
    // csdp reads every parameter from param.csdp, in this order.
    fn write_params(&self, dir: &Path) -> io::Result<()> {
        let params = format!(
            "axtol=1.0e-8\n\
             atytol=1.0e-8\n\
             objtol=1.0e-8\n\
             pinftol=1.0e8\n\
             dinftol=1.0e8\n\
             maxiter=100\n\
             minstepfrac=0.90\n\
             maxstepfrac=0.97\n\
             minstepp=1.0e-8\n\
             minstepd=1.0e-8\n\
             usexzgap=1\n\
             tweakgap=0\n\
             affine=0\n\
             printlevel={}\n\
             perturbobj=1\n\
             fastmode=0\n",
            self.settings.verbosity
        );
        fs::write(dir.join("param.csdp"), params)
    }
}

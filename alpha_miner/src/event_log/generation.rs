use std::fmt::Display;

use rand::{
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
    Rng, SeedableRng,
};
use serde::{Deserialize, Serialize};

use super::trace_log_struct::{Activity, Trace, TraceLog, TraceLogError};

///
/// Building block of a process description
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessConstruct {
    /// Single step (`Start With(X)` or `Then(X)`)
    Step(Activity),
    /// All activities in random order (`Parallel(X, Y, ...)`)
    Parallel(Vec<Activity>),
    /// All activities in the given order (`And(X, Y, ...)`)
    And(Vec<Activity>),
    /// Exactly one of the activities (`XOR(X, Y, ...)`)
    Xor(Vec<Activity>),
}

#[derive(Debug)]
/// Error encountered while parsing a process description or generating traces
pub enum GenerationError {
    /// A construct of the process description could not be parsed
    InvalidConstruct(String),
    /// Invalid activity label in the process description
    InvalidActivity(TraceLogError),
    /// A frequency is not within `[0, 1]`
    InvalidFrequency {
        /// Name of the config field
        name: &'static str,
        /// Passed value
        value: f64,
    },
    /// Frequency is non-zero, but there are no steps to choose from
    EmptyStepPool(&'static str),
}
impl Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidConstruct(c) => {
                write!(f, "Invalid process construct: '{}'", c)
            }
            GenerationError::InvalidActivity(e) => write!(f, "Invalid activity: {}", e),
            GenerationError::InvalidFrequency { name, value } => {
                write!(f, "{} must be within [0, 1], got {}", name, value)
            }
            GenerationError::EmptyStepPool(name) => {
                write!(f, "{} is empty but its frequency is non-zero", name)
            }
        }
    }
}
impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::InvalidActivity(e) => Some(e),
            _ => None,
        }
    }
}
impl From<TraceLogError> for GenerationError {
    fn from(e: TraceLogError) -> Self {
        Self::InvalidActivity(e)
    }
}

/// Split at top-level commas (i.e., not inside parentheses)
fn split_top_level(description: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut last = 0;
    for (i, c) in description.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&description[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&description[last..]);
    parts
}

fn parse_activities(args: &str) -> Result<Vec<Activity>, GenerationError> {
    Ok(args
        .split(',')
        .map(|a| Activity::new(a.trim()))
        .collect::<Result<Vec<_>, _>>()?)
}

///
/// Parse a process description
///
/// The description is a comma-separated list of `Start With(X)`, `Then(X)`, `Parallel(X, Y, ...)`,
/// `And(X, Y, ...)` and `XOR(X, Y, ...)`.
pub fn parse_process_description(
    description: &str,
) -> Result<Vec<ProcessConstruct>, GenerationError> {
    split_top_level(description)
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let invalid = || GenerationError::InvalidConstruct(segment.to_string());
            let (name, rest) = segment.split_once('(').ok_or_else(invalid)?;
            let args = rest.strip_suffix(')').ok_or_else(invalid)?;
            match name.trim() {
                "Start With" | "Then" => Ok(ProcessConstruct::Step(
                    Activity::new(args.trim()).map_err(|_| invalid())?,
                )),
                "Parallel" => Ok(ProcessConstruct::Parallel(parse_activities(args)?)),
                "And" => Ok(ProcessConstruct::And(parse_activities(args)?)),
                "XOR" => Ok(ProcessConstruct::Xor(parse_activities(args)?)),
                _ => Err(invalid()),
            }
        })
        .collect()
}

///
/// Configuration for [`generate_traces`]
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of traces to generate
    pub num_traces: usize,
    /// Steps that can be inserted as noise
    pub noise_steps: Vec<Activity>,
    /// Steps of uncommon paths
    pub uncommon_steps: Vec<Activity>,
    /// Probability of inserting a noise step after each construct
    pub noise_frequency: f64,
    /// Probability of inserting an uncommon step after each construct
    pub uncommon_paths_frequency: f64,
    /// Seed for reproducible generation (random if not set)
    pub seed: Option<u64>,
}
impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_traces: 100,
            noise_steps: Vec::new(),
            uncommon_steps: Vec::new(),
            noise_frequency: 0.0,
            uncommon_paths_frequency: 0.0,
            seed: None,
        }
    }
}
impl GenerationConfig {
    /// Check that frequencies are within `[0, 1]` and that step pools are non-empty when used
    pub fn validate(&self) -> Result<(), GenerationError> {
        for (name, value, pool) in [
            ("noise_frequency", self.noise_frequency, &self.noise_steps),
            (
                "uncommon_paths_frequency",
                self.uncommon_paths_frequency,
                &self.uncommon_steps,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenerationError::InvalidFrequency { name, value });
            }
            if value > 0.0 && pool.is_empty() {
                return Err(GenerationError::EmptyStepPool(name));
            }
        }
        Ok(())
    }
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn maybe_push(trace: &mut Vec<Activity>, rng: &mut StdRng, frequency: f64, pool: &[Activity]) {
    if rng.random::<f64>() < frequency {
        if let Some(step) = pool.choose(rng) {
            trace.push(step.clone());
        }
    }
}

///
/// Generate a [`TraceLog`] from parsed process constructs
///
/// After each construct, a random noise step and a random uncommon step may be appended
/// (with the configured frequencies).
/// Constructs resulting in no activities lead to [`TraceLogError::EmptyTrace`].
pub fn generate_traces(
    constructs: &[ProcessConstruct],
    config: &GenerationConfig,
) -> Result<TraceLog, GenerationError> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut traces = Vec::with_capacity(config.num_traces);
    for _ in 0..config.num_traces {
        let mut trace: Vec<Activity> = Vec::new();
        for construct in constructs {
            match construct {
                ProcessConstruct::Step(act) => trace.push(act.clone()),
                ProcessConstruct::Parallel(acts) => {
                    let mut acts = acts.clone();
                    acts.shuffle(&mut rng);
                    trace.extend(acts);
                }
                ProcessConstruct::And(acts) => trace.extend(acts.iter().cloned()),
                ProcessConstruct::Xor(acts) => {
                    if let Some(act) = acts.choose(&mut rng) {
                        trace.push(act.clone());
                    }
                }
            }
            maybe_push(&mut trace, &mut rng, config.noise_frequency, &config.noise_steps);
            maybe_push(
                &mut trace,
                &mut rng,
                config.uncommon_paths_frequency,
                &config.uncommon_steps,
            );
        }
        traces.push(Trace::new(trace)?);
    }
    let log = TraceLog::from_traces(traces);
    log::info!(
        "Generated {} traces ({} variants)",
        log.len(),
        log.variants().len()
    );
    Ok(log)
}

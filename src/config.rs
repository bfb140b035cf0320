use serde::Deserialize;

use crate::{
    error::Result,
    replace::Policy,
    sim::frame_count,
    trace::{self, Page, DEFAULT_DELIMITER},
};

#[derive(Deserialize)]
pub struct Config {
    frames: i64,
    references: String,
    #[serde(default)]
    policies: Vec<String>,
    #[serde(default)]
    delimiter: Option<String>,
}

/// A validated run: everything `simulate` needs, checked up front.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub frames: usize,
    pub references: Vec<Page>,
    pub policies: Vec<Policy>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_run(self) -> Result<RunConfig> {
        let frames = frame_count(self.frames)?;
        let delim = self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER);
        let references = trace::parse_nonempty(&self.references, delim)?;
        let policies = parse_policies(&self.policies)?;
        Ok(RunConfig {
            frames,
            references,
            policies,
        })
    }
}

/// Parses policy names; an empty list selects every policy.
pub fn parse_policies<S: AsRef<str>>(names: &[S]) -> Result<Vec<Policy>> {
    if names.is_empty() {
        return Ok(Policy::ALL.to_vec());
    }
    let mut policies = Vec::with_capacity(names.len());
    for name in names {
        let policy = name.as_ref().parse()?;
        if !policies.contains(&policy) {
            policies.push(policy);
        }
    }
    Ok(policies)
}

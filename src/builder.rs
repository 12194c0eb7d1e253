use crate::engine::{EngineConfig, MaybeSync, ProfileEngine};
use crate::error::EngineError;
use crate::objective::Objective;
use crate::traits::ProfileProblem;

/// Step-by-step construction of a [`ProfileEngine`] with custom tunables.
pub struct ProfileEngineBuilder<P, O> {
    problem: P,
    objective: O,
    config: EngineConfig,
}

impl<P, O> ProfileEngineBuilder<P, O>
where
    P: ProfileProblem + MaybeSync,
    O: Objective + MaybeSync,
{
    pub fn new(problem: P, objective: O) -> Self {
        Self {
            problem,
            objective,
            config: EngineConfig::default(),
        }
    }

    pub fn with_max_table_states(mut self, max_table_states: usize) -> Self {
        self.config.max_table_states = max_table_states;
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.config.parallel_threshold = parallel_threshold;
        self
    }

    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.config.shard_size = Some(shard_size.max(1));
        self
    }

    pub fn build(self) -> Result<ProfileEngine<P, O>, EngineError> {
        ProfileEngine::with_config(self.problem, self.objective, self.config)
    }
}

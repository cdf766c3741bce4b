/// Emitted after every sweep of policy evaluation or value iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepMetrics {
    /// Zero-based sweep number.
    pub sweep: usize,
    /// Largest absolute value change over the sweep.
    pub delta: f64,
}

/// Emitted after every evaluate-then-improve round of policy iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImprovementMetrics {
    /// Zero-based improvement round.
    pub iteration: usize,
    /// Number of states whose action changed during the improvement sweep.
    pub changed_states: usize,
    /// Mean value of the policy that was evaluated in this round.
    pub mean_value: f64,
}

/// Emitted after every simulated episode of the learning engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeMetrics {
    /// Zero-based episode number.
    pub episode: usize,
    /// Transitions taken before the episode ended.
    pub steps: usize,
    /// Undiscounted sum of rewards collected.
    pub total_reward: f64,
    /// Whether the episode ended in a terminal state rather than at the step cap.
    pub reached_terminal: bool,
}

impl EpisodeMetrics {
    pub(crate) fn new(episode: usize) -> Self {
        EpisodeMetrics {
            episode,
            steps: 0,
            total_reward: 0.0,
            reached_terminal: false,
        }
    }

    pub(crate) fn record(&mut self, reward: f64) {
        self.steps += 1;
        self.total_reward += reward;
    }
}

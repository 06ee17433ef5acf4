use rand::Rng;

/// Parameters of the simulated Go/No-Go participant.
#[derive(Debug, Clone, Copy)]
pub struct AgentParams {
    /// Q-value learning rate (alpha).
    pub learning_rate: f64,
    /// Inverse temperature for softmax action selection.
    pub beta: f64,
    /// General bias towards the go action.
    pub action_bias: f64,
    /// Bias inhibiting go in proportion to anticipated punishment.
    pub pavlovian_bias: f64,
    pub reward_sensitivity: f64,
    pub punishment_sensitivity: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            beta: 5.0,
            action_bias: 0.2,
            pavlovian_bias: 0.3,
            reward_sensitivity: 1.0,
            punishment_sensitivity: 1.0,
        }
    }
}

/// Softmax Q-learner over the two actions (go / no-go) with a
/// Rescorla-Wagner update. Used to drive simulated sessions.
#[derive(Debug, Clone)]
pub struct RlAgent {
    params: AgentParams,
    /// Q-values, index 0 = go, 1 = no-go.
    q: [f64; 2],
}

impl RlAgent {
    pub fn new(params: AgentParams) -> Self {
        Self { params, q: [0.0; 2] }
    }

    /// Probability of choosing the go action under the current Q-values,
    /// action bias and pavlovian bias.
    pub fn go_probability(&self) -> f64 {
        let mut weights = self.q;
        weights[0] += self.params.action_bias;
        if self.q[1] < 0.0 {
            weights[1] += self.params.pavlovian_bias * self.q[1].abs();
        }
        let max = weights[0].max(weights[1]);
        let exp_go = (self.params.beta * (weights[0] - max)).exp();
        let exp_nogo = (self.params.beta * (weights[1] - max)).exp();
        exp_go / (exp_go + exp_nogo)
    }

    /// Samples an action; `true` means press (go).
    pub fn choose<R: Rng>(&self, rng: &mut R) -> bool {
        rng.random_bool(self.go_probability())
    }

    /// Rescorla-Wagner update for the taken action, scaling the raw reward
    /// by reward or punishment sensitivity depending on its sign.
    pub fn learn(&mut self, knocked: bool, reward: f64) {
        let effective = if reward >= 0.0 {
            reward * self.params.reward_sensitivity
        } else {
            reward * self.params.punishment_sensitivity
        };
        let action = if knocked { 0 } else { 1 };
        let prediction_error = effective - self.q[action];
        self.q[action] += self.params.learning_rate * prediction_error;
    }

    pub fn q_values(&self) -> [f64; 2] {
        self.q
    }
}

impl Default for RlAgent {
    fn default() -> Self {
        Self::new(AgentParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn update_moves_q_towards_the_reward() {
        let mut agent = RlAgent::new(AgentParams {
            learning_rate: 0.1,
            beta: 5.0,
            action_bias: 0.0,
            pavlovian_bias: 0.0,
            reward_sensitivity: 1.0,
            punishment_sensitivity: 1.0,
        });
        agent.learn(true, 1.0);
        assert!((agent.q_values()[0] - 0.1).abs() < 1e-12);
        agent.learn(true, 1.0);
        assert!((agent.q_values()[0] - 0.19).abs() < 1e-12);
        assert_eq!(agent.q_values()[1], 0.0);
    }

    #[test]
    fn punishment_sensitivity_scales_negative_outcomes() {
        let mut agent = RlAgent::new(AgentParams {
            punishment_sensitivity: 2.0,
            ..AgentParams::default()
        });
        agent.learn(false, -1.0);
        assert!((agent.q_values()[1] - (-0.2)).abs() < 1e-12);
    }

    #[test]
    fn rewarding_go_shifts_choice_towards_go() {
        let mut agent = RlAgent::new(AgentParams {
            action_bias: 0.0,
            pavlovian_bias: 0.0,
            ..AgentParams::default()
        });
        let before = agent.go_probability();
        for _ in 0..20 {
            agent.learn(true, 1.0);
            agent.learn(false, -1.0);
        }
        let after = agent.go_probability();
        assert!(after > before);
        assert!(after > 0.9);

        let mut rng = StdRng::seed_from_u64(3);
        let gos = (0..1000).filter(|_| agent.choose(&mut rng)).count();
        assert!(gos > 900);
    }
}

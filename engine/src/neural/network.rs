
use crate::dataflow::Batch;

use super::config::Config as NeuralConfig;
use super::model::Model;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use utils::error::*;
use utils::{Serialize, Deserialize};

///
/// A linear softmax policy.
///
/// Each action has a weight vector over the observation features plus a 
/// bias; the action distribution is the softmax of the resulting logits.
/// Training minimizes the cross-entropy against the labelled action with 
/// plain stochastic gradient descent.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyNetwork 
{
    num_features: usize,
    num_actions: usize,
    learning_rate: f32,

    // One row per action, `num_features` weights followed by the bias.

    weights: Vec<Vec<f32>>
}

impl PolicyNetwork 
{
    ///
    /// Returns the action distribution for a single observation.
    ///
    pub fn distribution (& self, observation: & [f32]) -> Result<Vec<f32>>
    {
        ensure!(
            observation.len() == self.num_features, 
            "Expected {} observation features, got {}.", self.num_features, observation.len()
        );

        let logits = self.weights.iter()
            .map(|row| 
            {
                let (w, bias) = row.split_at(self.num_features);
                w.iter().zip(observation).map(|(w, x)| w * x).sum::<f32>() + bias[0]
            })
            .collect::<Vec<f32>>();

        Ok(softmax(& logits))
    }

    ///
    /// Loads a network from a weights file written by `save`.
    ///
    pub fn load (path: & str) -> Result<PolicyNetwork>
    {
        let net : PolicyNetwork = utils::from_json_file(path).context(format!("Failed to load weights file from '{}'.", path))?;

        ensure!(net.weights.len() == net.num_actions, "Weights file '{}' has {} rows for {} actions.", path, net.weights.len(), net.num_actions);
        ensure!(
            net.weights.iter().all(|row| row.len() == net.num_features + 1), 
            "Weights file '{}' does not match {} features.", path, net.num_features
        );

        Ok(net)
    }

    ///
    /// Creates a network with small random weights.
    ///
    pub fn new (config: & NeuralConfig, num_features: usize, num_actions: usize) -> Result<PolicyNetwork>
    {
        ensure!(num_features > 0 && num_actions > 0, "A policy needs at least one feature and one action.");

        let mut rng = StdRng::seed_from_u64(config.seed);
        let weights = (0 .. num_actions)
            .map(|_| (0 ..= num_features).map(|_| rng.random_range(-0.01_f32 .. 0.01)).collect::<Vec<f32>>())
            .collect();

        Ok(PolicyNetwork { num_features, num_actions, learning_rate: config.learning_rate, weights })
    }

    ///
    /// Returns the number of actions this policy chooses between.
    ///
    pub fn num_actions (& self) -> usize 
    {
        self.num_actions
    }

    ///
    /// Saves this network's weights.
    ///
    pub fn save (& self, path: & str) -> Result<()>
    {
        utils::to_json_file(self, path).context(format!("Failed to save model to path '{}'.", path))
    }
}

impl Model for PolicyNetwork 
{
    type Batch = Batch;

    fn predict (& self, inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>
    {
        inputs.iter().map(|observation| self.distribution(observation)).collect()
    }

    fn train_step (& mut self, batch: & Batch) -> Result<f32>
    {
        ensure!(! batch.is_empty(), "Cannot train on an empty batch.");
        ensure!(batch.observations.len() == batch.actions.len(), "Batch has mismatched observations and actions.");

        let mut gradient = vec![vec![0.0_f32; self.num_features + 1]; self.num_actions];
        let mut loss = 0.0_f32;

        for (observation, & action) in batch.observations.iter().zip(& batch.actions)
        {
            ensure!(action < self.num_actions, "Label {} is outside of {} actions.", action, self.num_actions);

            let probs = self.distribution(observation)?;
            loss -= probs[action].max(f32::MIN_POSITIVE).ln();

            for (a, row) in gradient.iter_mut().enumerate()
            {
                let delta = probs[a] - if a == action { 1.0 } else { 0.0 };
                for (g, x) in row.iter_mut().zip(observation.iter().chain(std::iter::once(& 1.0)))
                {
                    * g += delta * x;
                }
            }
        }

        let scale = self.learning_rate / batch.len() as f32;
        for (row, grad) in self.weights.iter_mut().zip(& gradient)
        {
            for (w, g) in row.iter_mut().zip(grad)
            {
                * w -= scale * g;
            }
        }

        Ok(loss / batch.len() as f32)
    }
}

fn softmax (logits: & [f32]) -> Vec<f32>
{
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.iter().map(|l| (l - max).exp()).collect::<Vec<f32>>();
    let total : f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use crate::dataflow::{DataFlow, ExpertPlay};

    use arcade::CatchConfig;

    fn network () -> Result<PolicyNetwork>
    {
        PolicyNetwork::new(& NeuralConfig::default(), 3, 3)
    }

    #[test]
    fn distributions_sum_to_one () -> Result<()>
    {
        let net = network()?;
        let out = net.predict(& [vec![0.0, 0.5, 1.0], vec![1.0, 1.0, 0.0]])?;

        assert_eq!(out.len(), 2);
        for dist in out 
        {
            assert_eq!(dist.len(), 3);
            assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }

        Ok(())
    }

    #[test]
    fn rejects_wrong_shapes () -> Result<()>
    {
        let mut net = network()?;

        assert!(net.predict(& [vec![0.0; 4]]).is_err());
        assert!(net.train_step(& Batch { observations: vec![vec![0.0; 3]], actions: vec![5] }).is_err());
        assert!(net.train_step(& Batch { observations: vec![], actions: vec![] }).is_err());

        Ok(())
    }

    #[test]
    fn imitation_lowers_the_cost () -> Result<()>
    {
        let mut net = network()?;
        let mut data = ExpertPlay::new(CatchConfig::default(), 1, 64, 400, 0.3)?;
        data.reset_state();

        let first = data.get_data()?.ok_or_else(|| error!("no data"))?;
        let initial = net.train_step(& first)?;

        let mut last = initial;
        while let Some(batch) = data.get_data()?
        {
            last = net.train_step(& batch)?;
        }

        assert!(last < initial * 0.8, "cost went from {} to {}", initial, last);
        Ok(())
    }

    #[test]
    fn saved_weights_load_back () -> Result<()>
    {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("trained").join("best.json");
        let path = path.to_string_lossy().into_owned();

        let net = network()?;
        net.save(& path)?;

        assert_eq!(PolicyNetwork::load(& path)?, net);
        assert!(PolicyNetwork::load("does/not/exist.json").is_err());

        Ok(())
    }
}

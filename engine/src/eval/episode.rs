
use crate::neural::PredictFn;
use crate::sync::Coordinator;

use super::stat::StatCounter;

use arcade::Player;

use rand::Rng;

use utils::error::*;
use utils::log;

///
/// Plays one episode with an epsilon-greedy policy and returns its score,
/// the mean of the rewards received.
///
/// At every step the action with the highest predicted probability is 
/// taken, except that with probability `epsilon` it is replaced by a 
/// random action from the player's action space.
///
pub fn play_one_episode<R: Rng> (player: & mut dyn Player, func: & dyn PredictFn, epsilon: f64, rng: & mut R) -> Result<f64>
{
    ensure!((0.0 ..= 1.0).contains(& epsilon), "Exploration rate {} is outside of [0, 1].", epsilon);

    let space = player.action_space();

    let mut select = |observation: & [f32]| -> Result<usize>
    {
        let outputs = func.predict(& [observation.to_vec()])?;
        let dist = outputs.first().ok_or_else(|| error!("The predictor returned an empty batch."))?;

        let mut action = argmax(dist).ok_or_else(|| error!("The predictor returned an empty distribution."))?;
        if rng.random_bool(epsilon)
        {
            action = space.sample(rng);
        }
        ensure!(space.contains(action), "Action {} is outside of the action space.", action);

        Ok(action)
    };

    let rewards = player.play_one_episode(& mut select)?;
    ensure!(! rewards.is_empty(), "The episode ended without a single reward.");

    Ok(rewards.iter().map(|r| * r as f64).sum::<f64>() / rewards.len() as f64)
}

///
/// Plays episodes one after another, logging each score, until the 
/// coordinator is stopped or `episodes` have been played (0 plays forever).
///
pub fn play_model<R: Rng> (player: & mut dyn Player, func: & dyn PredictFn, epsilon: f64, rng: & mut R, coord: & Coordinator, episodes: usize) -> Result<StatCounter>
{
    let mut stat = StatCounter::new();

    while ! coord.should_stop() && (episodes == 0 || stat.count() < episodes)
    {
        let score = play_one_episode(player, func, epsilon, rng)?;
        log::info!("Total: {}", score);
        stat.feed(score);
    }

    Ok(stat)
}

fn argmax (values: & [f32]) -> Option<usize>
{
    values.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use arcade::{Catch, CatchConfig};
    use arcade::catch::{LEFT, RIGHT, STAY};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn oracle (inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>
    {
        Ok(inputs.iter().map(|obs| 
        {
            let mut dist = vec![0.0; 3];
            let (ball, paddle) = (obs[0], obs[2]);
            let action = if ball < paddle { LEFT } else if ball > paddle { RIGHT } else { STAY };
            dist[action] = 1.0;
            dist
        }).collect())
    }

    #[test]
    fn greedy_oracle_catches_every_ball () -> Result<()>
    {
        let mut player = Catch::new(CatchConfig::default(), 4)?;
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0 .. 20 
        {
            let score = play_one_episode(& mut player, & oracle, 0.0, & mut rng)?;
            assert_eq!(score, 1.0 / 7.0);
        }

        Ok(())
    }

    #[test]
    fn full_exploration_ignores_the_predictor () -> Result<()>
    {
        let mut player = Catch::new(CatchConfig::default(), 4)?;
        let mut rng = StdRng::seed_from_u64(1);

        let stat = play_model(& mut player, & oracle, 1.0, & mut rng, & Coordinator::new(), 200)?;

        assert_eq!(stat.count(), 200);
        assert!(stat.average().unwrap_or(1.0) < 1.0 / 7.0);

        Ok(())
    }

    #[test]
    fn stopped_coordinator_plays_nothing () -> Result<()>
    {
        let mut player = Catch::new(CatchConfig::default(), 4)?;
        let mut rng = StdRng::seed_from_u64(2);

        let coord = Coordinator::new();
        coord.request_stop();

        let stat = play_model(& mut player, & oracle, 0.0, & mut rng, & coord, 0)?;
        assert_eq!(stat.count(), 0);

        Ok(())
    }

    #[test]
    fn exploration_rate_above_one_is_an_error () -> Result<()>
    {
        let mut player = Catch::new(CatchConfig::default(), 4)?;
        let mut rng = StdRng::seed_from_u64(5);

        assert!(play_one_episode(& mut player, & oracle, 1.5, & mut rng).is_err());
        assert!(play_model(& mut player, & oracle, -0.1, & mut rng, & Coordinator::new(), 3).is_err());

        Ok(())
    }

    #[test]
    fn broken_predictor_is_an_error () -> Result<()>
    {
        let mut player = Catch::new(CatchConfig::default(), 4)?;
        let mut rng = StdRng::seed_from_u64(3);

        let empty = |_: & [Vec<f32>]| -> Result<Vec<Vec<f32>>> { Ok(vec![]) };
        assert!(play_one_episode(& mut player, & empty, 0.0, & mut rng).is_err());

        Ok(())
    }
}

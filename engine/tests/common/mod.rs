#![allow(dead_code)]

use arcade::{ActionSpace, Player, PlayerFactory};

use engine::dataflow::DataFlow;
use engine::neural::Model;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use utils::error::*;

///
/// A one-step game that pays a fixed reward, after an optional delay.
///
pub struct FixedReward 
{
    pub reward: f32,
    pub delay: Duration
}

impl Player for FixedReward 
{
    fn action_space (& self) -> ActionSpace 
    {
        ActionSpace::new(2)
    }

    fn observation_size (& self) -> usize 
    {
        1
    }

    fn play_one_episode (& mut self, select: & mut dyn FnMut(& [f32]) -> Result<usize>) -> Result<Vec<f32>>
    {
        select(& [0.0])?;
        thread::sleep(self.delay);
        Ok(vec![self.reward])
    }
}

///
/// A one-step game whose reward is the index of the chosen action.
///
pub struct ActionReward;

impl Player for ActionReward 
{
    fn action_space (& self) -> ActionSpace 
    {
        ActionSpace::new(3)
    }

    fn observation_size (& self) -> usize 
    {
        1
    }

    fn play_one_episode (& mut self, select: & mut dyn FnMut(& [f32]) -> Result<usize>) -> Result<Vec<f32>>
    {
        let action = select(& [0.0])?;
        Ok(vec![action as f32])
    }
}

pub fn fixed_reward_factory (reward: f32, delay: Duration) -> PlayerFactory 
{
    Arc::new(move || -> Result<Box<dyn Player>> { Ok(Box::new(FixedReward { reward, delay })) })
}

pub fn action_reward_factory () -> PlayerFactory 
{
    Arc::new(|| -> Result<Box<dyn Player>> { Ok(Box::new(ActionReward)) })
}

///
/// Returns an inference function that always prefers the given action.
///
pub fn always (action: usize, num_actions: usize) -> impl Fn(& [Vec<f32>]) -> Result<Vec<Vec<f32>>> + Send + Sync 
{
    move |inputs: & [Vec<f32>]| 
    {
        Ok(inputs.iter().map(|_| 
        {
            let mut dist = vec![0.0; num_actions];
            dist[action] = 1.0;
            dist
        }).collect())
    }
}

///
/// A model that remembers every batch it was trained on.
///
#[derive(Debug, Default)]
pub struct Recorder 
{
    pub seen: Vec<u32>
}

impl Model for Recorder 
{
    type Batch = u32;

    fn train_step (& mut self, batch: & u32) -> Result<f32>
    {
        self.seen.push(* batch);
        Ok(* batch as f32)
    }

    fn predict (& self, inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>
    {
        Ok(inputs.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

///
/// A dataflow that fails after producing a number of datapoints.
///
pub struct Failing 
{
    pub left: usize
}

impl DataFlow for Failing 
{
    type Datapoint = u32;

    fn get_data (& mut self) -> Result<Option<u32>>
    {
        ensure!(self.left > 0, "the data source went away");
        self.left -= 1;
        Ok(Some(1))
    }
}

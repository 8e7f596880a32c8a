
use super::action::ActionSpace;
use super::player::Player;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use utils::error::*;
use utils::{Serialize, Deserialize};

///
/// Moves the paddle one column to the left.
///
pub const LEFT : usize = 0;

///
/// Leaves the paddle where it is.
///
pub const STAY : usize = 1;

///
/// Moves the paddle one column to the right.
///
pub const RIGHT : usize = 2;

///
/// The board dimensions of a game of Catch.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CatchConfig 
{
    #[serde(default = "width")]
    pub width: usize,

    #[serde(default = "height")]
    pub height: usize
}

impl Default for CatchConfig 
{
    fn default () -> CatchConfig 
    {
        CatchConfig { width: width(), height: height() }
    }
}

fn width () -> usize 
{
    5
}

fn height () -> usize 
{
    8
}

///
/// The game of Catch.
///
/// A ball appears in a random column of the top row and falls one row 
/// per step. The paddle lives on the bottom row and moves left, stays, 
/// or moves right at every step. When the ball reaches the bottom row 
/// the episode ends with a reward of +1 if the paddle is under it, and 
/// -1 otherwise; every other step is rewarded with 0.
///
/// Observations are `[ball_x, ball_y, paddle_x]`, each scaled to [0, 1].
///
#[derive(Debug)]
pub struct Catch 
{
    config: CatchConfig,
    rng: StdRng,

    ball_x: usize,
    ball_y: usize,
    paddle_x: usize
}

impl Catch 
{
    ///
    /// Returns the action that keeps the paddle moving towards the ball.
    ///
    pub fn expert_action (& self) -> usize 
    {
        match self.ball_x.cmp(& self.paddle_x)
        {
            std::cmp::Ordering::Less    => LEFT,
            std::cmp::Ordering::Equal   => STAY,
            std::cmp::Ordering::Greater => RIGHT
        }
    }

    ///
    /// Returns whether the ball has reached the bottom row.
    ///
    pub fn is_over (& self) -> bool 
    {
        self.ball_y + 1 >= self.config.height
    }

    ///
    /// Creates a new game, seeded for reproducibility, and starts an episode.
    ///
    pub fn new (config: CatchConfig, seed: u64) -> Result<Catch>
    {
        ensure!(config.width >= 1, "Catch needs at least one column, got {}.", config.width);
        ensure!(config.height >= 2, "Catch needs at least two rows, got {}.", config.height);

        let mut game = Catch { config, rng: StdRng::seed_from_u64(seed), ball_x: 0, ball_y: 0, paddle_x: 0 };
        game.reset();

        Ok(game)
    }

    ///
    /// Returns the current observation vector.
    ///
    pub fn observation (& self) -> Vec<f32>
    {
        let x_scale = (self.config.width - 1).max(1) as f32;
        let y_scale = (self.config.height - 1) as f32;

        vec![
            self.ball_x as f32 / x_scale,
            self.ball_y as f32 / y_scale,
            self.paddle_x as f32 / x_scale
        ]
    }

    ///
    /// Starts a new episode: a fresh ball on the top row and a centred paddle.
    ///
    pub fn reset (& mut self)
    {
        self.ball_x = self.rng.random_range(0 .. self.config.width);
        self.ball_y = 0;
        self.paddle_x = self.config.width / 2;
    }

    ///
    /// Applies an action, lets the ball fall, and returns the reward and 
    /// whether the episode is over.
    ///
    pub fn step (& mut self, action: usize) -> Result<(f32, bool)>
    {
        ensure!(! self.is_over(), "Cannot step a finished episode.");

        self.paddle_x = match action 
        {
            LEFT  => self.paddle_x.saturating_sub(1),
            STAY  => self.paddle_x,
            RIGHT => (self.paddle_x + 1).min(self.config.width - 1),
            _     => bail!("Invalid action {} for Catch.", action)
        };
        self.ball_y += 1;

        if self.is_over()
        {
            let reward = if self.ball_x == self.paddle_x { 1.0 } else { -1.0 };
            return Ok((reward, true));
        }

        Ok((0.0, false))
    }
}

impl Player for Catch 
{
    fn action_space (& self) -> ActionSpace 
    {
        ActionSpace::new(3)
    }

    fn observation_size (& self) -> usize 
    {
        3
    }

    fn play_one_episode (& mut self, select: & mut dyn FnMut(& [f32]) -> Result<usize>) -> Result<Vec<f32>>
    {
        self.reset();

        let mut rewards = Vec::with_capacity(self.config.height - 1);
        loop 
        {
            let action = select(& self.observation())?;
            let (reward, over) = self.step(action)?;
            rewards.push(reward);

            if over 
            {
                return Ok(rewards);
            }
        }
    }
}

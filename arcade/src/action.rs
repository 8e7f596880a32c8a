
use rand::Rng;

///
/// A discrete action space of `n` actions, numbered `0 .. n`.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionSpace 
{
    n: usize
}

impl ActionSpace 
{
    ///
    /// Creates an action space with the given number of actions.
    ///
    pub fn new (n: usize) -> ActionSpace 
    {
        ActionSpace { n }
    }

    ///
    /// Returns the number of actions.
    ///
    pub fn num_actions (& self) -> usize 
    {
        self.n
    }

    ///
    /// Returns whether the given action belongs to this space.
    ///
    pub fn contains (& self, action: usize) -> bool 
    {
        action < self.n
    }

    ///
    /// Draws a uniformly random action.
    ///
    pub fn sample<R: Rng> (& self, rng: & mut R) -> usize 
    {
        rng.random_range(0 .. self.n)
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_stay_in_range () 
    {
        let space = ActionSpace::new(3);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0 .. 1000 
        {
            assert!(space.contains(space.sample(& mut rng)));
        }
    }
}

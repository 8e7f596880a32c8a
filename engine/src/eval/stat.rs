
///
/// Running count, sum and maximum of a stream of scores.
///
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatCounter 
{
    count: usize,
    sum: f64,
    max: f64
}

impl StatCounter 
{
    ///
    /// Returns the mean of the scores fed so far, if any.
    ///
    pub fn average (& self) -> Option<f64>
    {
        match self.count 
        {
            0 => None,
            n => Some(self.sum / n as f64)
        }
    }

    ///
    /// Returns the number of scores fed so far.
    ///
    pub fn count (& self) -> usize 
    {
        self.count
    }

    ///
    /// Adds one score.
    ///
    pub fn feed (& mut self, score: f64)
    {
        self.max = if self.count == 0 { score } else { self.max.max(score) };
        self.sum += score;
        self.count += 1;
    }

    ///
    /// Returns the largest score fed so far, if any.
    ///
    pub fn max (& self) -> Option<f64>
    {
        match self.count 
        {
            0 => None,
            _ => Some(self.max)
        }
    }

    ///
    /// Creates an empty counter.
    ///
    pub fn new () -> StatCounter 
    {
        StatCounter::default()
    }

    ///
    /// Forgets every score fed so far.
    ///
    pub fn reset (& mut self)
    {
        * self = StatCounter::default();
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn tracks_mean_and_max () 
    {
        let mut stat = StatCounter::new();
        assert_eq!(stat.average(), None);
        assert_eq!(stat.max(), None);

        for score in [-3.0, -1.0, -2.0]
        {
            stat.feed(score);
        }

        assert_eq!(stat.count(), 3);
        assert_eq!(stat.average(), Some(-2.0));
        assert_eq!(stat.max(), Some(-1.0));

        stat.reset();
        assert_eq!(stat.count(), 0);
        assert_eq!(stat.max(), None);
    }
}


use super::DataFlow;

use utils::error::*;

///
/// Chains passes of an inner dataflow into one long pass.
///
/// With a count of `None` the resulting sequence never ends; with 
/// `Some(n)` it ends after `n` inner passes. An inner pass that yields 
/// nothing at all ends the repetition, since it would otherwise spin.
///
#[derive(Debug)]
pub struct RepeatedData<D>
{
    ds: D,
    count: Option<usize>,
    passes: usize,
    fresh: bool
}

impl<D: DataFlow> RepeatedData<D>
{
    ///
    /// Repeats the dataflow forever.
    ///
    pub fn forever (ds: D) -> RepeatedData<D>
    {
        RepeatedData { ds, count: None, passes: 0, fresh: true }
    }

    ///
    /// Repeats the dataflow for the given number of passes.
    ///
    pub fn new (ds: D, count: usize) -> RepeatedData<D>
    {
        RepeatedData { ds, count: Some(count), passes: 0, fresh: true }
    }

    fn exhausted (& self) -> bool 
    {
        self.count.map_or(false, |count| self.passes >= count)
    }
}

impl<D: DataFlow> DataFlow for RepeatedData<D>
{
    type Datapoint = D::Datapoint;

    fn reset_state (& mut self)
    {
        self.passes = 0;
        self.fresh = true;
        self.ds.reset_state();
    }

    fn get_data (& mut self) -> Result<Option<D::Datapoint>>
    {
        while ! self.exhausted()
        {
            match self.ds.get_data()?
            {
                Some(dp) => 
                {
                    self.fresh = false;
                    return Ok(Some(dp));
                },
                None => 
                {
                    self.passes += 1;
                    if self.fresh 
                    {
                        bail!("The repeated dataflow produced an empty pass.");
                    }
                    self.fresh = true;
                }
            }
        }

        Ok(None)
    }

    fn size (& self) -> Option<usize>
    {
        match self.count 
        {
            Some(count) => self.ds.size().map(|size| size * count),
            None        => None
        }
    }
}

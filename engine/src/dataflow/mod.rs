pub mod expert;
pub mod repeat;

pub use expert::{Batch, ExpertPlay};
pub use repeat::RepeatedData;

use std::collections::VecDeque;

use utils::error::*;

///
/// A restartable source of datapoints.
///
/// Data is consumed in passes: `get_data` yields datapoints until it 
/// returns `None`, which ends the current pass; the next call begins a 
/// new one. `reset_state` is called once by the consumer before the 
/// first pass, on the thread that will consume the data.
///
pub trait DataFlow : Send 
{
    type Datapoint : Send;

    ///
    /// Prepares the source for a fresh sequence of passes.
    ///
    fn reset_state (& mut self) {}

    ///
    /// Produces the next datapoint of the current pass.
    ///
    fn get_data (& mut self) -> Result<Option<Self::Datapoint>>;

    ///
    /// Returns the number of datapoints in one pass, if known.
    ///
    fn size (& self) -> Option<usize>
    {
        None
    }
}

///
/// A dataflow over a fixed list of datapoints.
///
#[derive(Clone, Debug)]
pub struct ListData<T>
{
    items: Vec<T>,
    pending: VecDeque<T>
}

impl<T: Clone> ListData<T>
{
    ///
    /// Creates a dataflow that yields the given items once per pass.
    ///
    pub fn new (items: Vec<T>) -> ListData<T>
    {
        let pending = items.iter().cloned().collect();
        ListData { items, pending }
    }
}

impl<T: Clone + Send> DataFlow for ListData<T>
{
    type Datapoint = T;

    fn reset_state (& mut self)
    {
        self.pending = self.items.iter().cloned().collect();
    }

    fn get_data (& mut self) -> Result<Option<T>>
    {
        match self.pending.pop_front()
        {
            Some(item) => Ok(Some(item)),
            None => 
            {
                self.pending = self.items.iter().cloned().collect();
                Ok(None)
            }
        }
    }

    fn size (& self) -> Option<usize>
    {
        Some(self.items.len())
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn list_passes_end_and_restart () -> Result<()>
    {
        let mut data = ListData::new(vec!['a', 'b']);
        data.reset_state();

        assert_eq!(data.get_data()?, Some('a'));
        assert_eq!(data.get_data()?, Some('b'));
        assert_eq!(data.get_data()?, None);
        assert_eq!(data.get_data()?, Some('a'));
        assert_eq!(data.size(), Some(2));

        Ok(())
    }
}

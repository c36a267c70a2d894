//! Watch module - the resilient fetch cycle and the poll loop around it

mod fetch;
mod poll;

pub use fetch::FetchCycle;
pub use poll::PollLoop;

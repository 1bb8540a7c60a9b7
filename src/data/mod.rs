//! Data module - Sample series and animation state

mod series;

pub use series::{ChartState, SampleSeries};

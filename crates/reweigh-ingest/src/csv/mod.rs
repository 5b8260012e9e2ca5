//! Dataset file reading.

mod reader;

pub use reader::{
    ReadOptions, read_dataset, read_dataset_with_options, validate_dataframe_shape,
    validate_encoding,
};

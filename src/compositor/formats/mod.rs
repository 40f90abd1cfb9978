// Output encoders, one module per format.
pub mod jpeg;
pub mod png;

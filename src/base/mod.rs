//! Implements the base structures: tensors, parameters, scales, and errors

mod constants;
mod error;
mod parameters;
mod samples;
mod scales;
mod tensor6;
pub use crate::base::constants::*;
pub use crate::base::error::*;
pub use crate::base::parameters::*;
pub use crate::base::samples::*;
pub use crate::base::scales::*;
pub use crate::base::tensor6::*;

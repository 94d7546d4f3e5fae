mod constraint_operation_error;
mod pair_codec;
mod propagation_status;
mod variable_error;

pub use constraint_operation_error::ConstraintOperationError;
pub use pair_codec::PairCodec;
pub use propagation_status::*;
pub use variable_error::VariableError;

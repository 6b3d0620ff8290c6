//! Validator factory: model metadata -> runtime input validators for each CRUD operation.

mod operations;
mod primitives;

pub use operations::{envelope, input_validator, operation_validators, OperationValidatorSet};
pub use primitives::{
    create_data_input, include_input, order_by_input, select_input, unique_where_input, update_data_input,
    where_input, Primitives,
};

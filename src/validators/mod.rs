pub mod vehicle_validator;

pub mod response;
pub mod vehicle_dto;

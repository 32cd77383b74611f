pub mod vehicle_repository;

pub mod tasks_repository;
pub mod tasks_service;

mod tasks_service_tests;

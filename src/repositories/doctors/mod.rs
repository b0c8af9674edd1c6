pub mod doctor_repo;

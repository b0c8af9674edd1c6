pub mod address_repo;

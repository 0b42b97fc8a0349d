pub mod mssql;
pub mod postgres;

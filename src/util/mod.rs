pub mod yaml_date;

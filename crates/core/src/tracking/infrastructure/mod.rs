pub mod http_api_source;
pub mod json_file_source;

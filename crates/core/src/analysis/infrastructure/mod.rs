pub mod http_analysis_client;

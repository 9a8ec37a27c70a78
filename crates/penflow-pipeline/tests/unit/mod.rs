mod config_loading;
mod error_coverage;

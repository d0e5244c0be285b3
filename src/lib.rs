pub mod asset_match;
pub mod asset_names;
pub mod cli_args;
pub mod config;
pub mod feed_parse;
pub mod feed_shape;
pub mod leaders;
pub mod model;
pub mod outcome;
pub mod report_export;
pub mod standings;
pub mod standouts;
pub mod stat_keys;
pub mod upload_ledger;

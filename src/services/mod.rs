pub mod tracker_api;

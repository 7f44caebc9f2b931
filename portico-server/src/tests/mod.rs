mod auth_flow_tests;
mod test_utils;

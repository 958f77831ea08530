pub mod cargo_env {
    pub const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
}

pub mod env {
    pub const PREFIX: &str = "TESTRAIL_";
    pub const CUSTOM_PREFIX: &str = "CUSTOM_";
}

pub mod defaults {
    pub const STEP_RESULT_KEY: &str = "custom_step_results";
    pub const CLOSE_RUN: &str = "true";
    pub const TIMEOUT_SECS: u64 = 10;
    pub const PASSED_STATUS_ID: u32 = 1;
    pub const SKIPPED_STATUS_ID: u32 = 4;
    pub const FAILED_STATUS_ID: u32 = 5;
}

//! # System Constants
//!
//! Environment variable names, built-in defaults and the structured log
//! operation names shared across the crate.

/// Environment variables read by the engine
pub mod env_vars {
    /// Path to a TOML configuration file
    pub const CONFIG_PATH: &str = "STATE_NOTIFY_CONFIG_PATH";
    /// Prefix for `STATE_NOTIFY__SECTION__KEY` overrides
    pub const CONFIG_PREFIX: &str = "STATE_NOTIFY";
}

/// Known environment names
pub mod environments {
    pub const DEVELOPMENT: &str = "development";
    pub const PRODUCTION: &str = "production";
}

/// Built-in defaults
pub mod defaults {
    /// Delay before a flagged deactivation takes effect
    pub const DELAY_MS: u64 = 1_000;
    /// Upper bound accepted for configured delays (one hour)
    pub const MAX_DELAY_MS: u64 = 3_600_000;
    pub const LOG_DIRECTORY: &str = "log";
}

/// Operation names used in structured log records
pub mod operations {
    pub const ACTIVATE: &str = "activate";
    pub const END: &str = "end";
    pub const SET_STATE: &str = "set_state";
    pub const SHIFT_STATE: &str = "shift_state";
    pub const OVERRIDE_CURRENT: &str = "override_current";
    pub const REPLACE_CATALOG: &str = "replace_catalog";
    pub const SET_ACTIVE: &str = "set_active";
    pub const SET_INACTIVE: &str = "set_inactive";
    pub const TOGGLE: &str = "toggle";
    pub const HARD_SET: &str = "set";
    pub const SET_ALL_ACTIVE: &str = "set_all_active";
    pub const SET_ALL_INACTIVE: &str = "set_all_inactive";
    pub const REGISTER_LISTENER: &str = "register_listener";
    pub const UNREGISTER_LISTENER: &str = "unregister_listener";
}

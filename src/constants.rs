pub const CONFIG_FILE: &str = "config.yaml";
pub const CONFIG_SUBDIR: &str = "flame";
pub const CONFIG_ENV: &str = "FLAME_CONFIG";
pub const ADDRESS_ENV: &str = "FLAME_ADDRESS";
pub const DEFAULT_ADDRESS: &str = "http://localhost:8080";

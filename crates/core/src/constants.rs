/// Constants used throughout the noctivault codebase
// Store file names
pub const REFERENCES_FILENAME: &str = "noctivault.yaml";
pub const LOCAL_STORE_FILENAME: &str = "noctivault.local-store.yaml";
pub const LOCAL_STORE_ENC_FILENAME: &str = "noctivault.local-store.yaml.enc";

// Key material file names
pub const SIBLING_KEY_FILENAME: &str = "local.key";
pub const DEFAULT_KEY_DIR: &str = "noctivault";
pub const DEFAULT_KEY_FILENAME: &str = "local.key";

// Environment variable names
pub const KEY_FILE_ENV_VAR: &str = "NOCTIVAULT_LOCAL_KEY_FILE";
pub const PASSPHRASE_ENV_VAR: &str = "NOCTIVAULT_LOCAL_PASSPHRASE";
pub const LOG_ENV_VAR: &str = "NOCTIVAULT_LOG";

// Fixed display form of every secret leaf
pub const MASK_TOKEN: &str = "***";

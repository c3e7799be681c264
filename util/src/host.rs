//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable pointing at the root of the software checkout.
///
/// Parameter files are read from `$FLY_SW_ROOT/params` and sessions are created underneath this
/// directory.
pub const SW_ROOT_ENV_VAR: &str = "FLY_SW_ROOT";

/// Get the software root directory from the environment.
pub fn get_fly_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

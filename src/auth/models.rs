//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims structure
///
/// `sub` is the identity provider's user id, the same id the directory and
/// interview records reference.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

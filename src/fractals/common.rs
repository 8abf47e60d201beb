use serde::{Deserialize, Serialize};

use super::newtons_method::NewtonsMethodParams;

/// Top-level format of a parameter file, e.g. `{ "NewtonsMethod": { ... } }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum FractalParams {
    NewtonsMethod(Box<NewtonsMethodParams>),
}

impl Default for FractalParams {
    fn default() -> Self {
        FractalParams::NewtonsMethod(Box::default())
    }
}

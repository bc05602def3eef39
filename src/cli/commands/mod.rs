mod eval;
mod prims;
mod util;

pub(crate) use eval::{cmd_call, cmd_eval};
pub(crate) use prims::{cmd_prims, cmd_show};

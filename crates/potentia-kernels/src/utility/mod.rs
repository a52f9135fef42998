pub(crate) mod checks;
pub mod util;

mod builder;
mod compiled;
mod error;
mod io;
pub mod problems;
mod spec;

pub use builder::MdpBuilder;
pub use compiled::{ActionKey, CompiledMdp, StateKey};
pub use error::{MdpError, Site};
pub use io::{compile_yaml, load_yaml, save_yaml};
pub use spec::{ActionSpec, MdpSpec, OutcomeSpec, StateSpec};

mod common;
mod descriptor;
mod grid;
mod lowering;
mod module;
mod params;
mod platform;
mod validate;

pub mod layout;

pub use common::*;
pub use descriptor::{
    Assembly, Attribute, BackendConfig, CallDescriptor, API_VERSION, CALL_TARGET_NAME,
};
pub use grid::{Dim3, GridSpec};
pub use lowering::{lower_call, CallSite, Lowered};
pub use module::{KernelModule, LoweredModule, ModuleLowering};
pub use params::{
    CompilerParams, ParamValue, TuningParams, BACKEND_KEY, NUM_STAGES, NUM_WARPS,
    SERIALIZED_METADATA,
};
pub use platform::{Defaults, Platform};
pub use validate::GridMapping;

use crate::{GridMapping, GridSpec, LoweringError, Platform, ShapeDescriptor};
use std::io;

/// 编译好的内核模块。
pub trait KernelModule {
    /// 以模块自身的二进制编码写出。
    fn write_bytecode(&self, w: &mut impl io::Write) -> io::Result<()>;
    /// 可读的文本形式，仅用于调试输出。
    fn asm(&self) -> String;
}

pub struct LoweredModule<M> {
    pub module: M,
    /// 执行内核实际需要的网格。
    pub grid: GridSpec,
}

/// 内核程序编译器。
///
/// 可能耗时，也可能失败；不同调用点可以并发调用，每次调用产生独立的模块。
pub trait ModuleLowering {
    type Program;
    type Module: KernelModule;

    /// `shapes` 为全部输入形状之后接全部输出形状。
    fn lower_module(
        &self,
        program: &Self::Program,
        shapes: &[ShapeDescriptor],
        grid_mapping: &GridMapping,
        name: &str,
        platform: Platform,
    ) -> Result<LoweredModule<Self::Module>, LoweringError>;
}

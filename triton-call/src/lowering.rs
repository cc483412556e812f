use crate::{
    Assembly, CallDescriptor, CompilerParams, GridMapping, KernelModule, LoweredModule,
    LoweringError, ModuleLowering, Platform, ShapeDescriptor,
};
use log::{debug, info};
use std::fmt;

/// 一个内核调用点的全部降级输入。
pub struct CallSite<'a, P, V> {
    pub program: &'a P,
    /// 调用点上的操作数值。
    pub operands: Vec<V>,
    /// 调用点上实际的操作数数组。
    pub avals_in: &'a [ShapeDescriptor],
    /// 调用点上实际的结果数组。
    pub avals_out: &'a [ShapeDescriptor],
    pub in_shapes: &'a [ShapeDescriptor],
    pub out_shapes: &'a [ShapeDescriptor],
    /// 走解释执行路径，不编译内核。
    pub interpret: bool,
    pub debug: bool,
    pub input_output_aliases: &'a [(usize, usize)],
    pub grid_mapping: &'a GridMapping,
    pub name: &'a str,
    pub compiler_params: CompilerParams,
    /// 调用点上的平台列表，为空时使用模块级的平台列表。
    pub platforms: &'a [&'a str],
    pub module_platforms: &'a [&'a str],
}

pub enum Lowered<V> {
    Custom(CallDescriptor<V>),
    /// 调用方要求解释执行，操作数原样交还。
    Interpret(Vec<V>),
}

impl<V> Lowered<V> {
    #[inline]
    pub fn custom(self) -> Option<CallDescriptor<V>> {
        match self {
            Self::Custom(call) => Some(call),
            Self::Interpret(_) => None,
        }
    }
}

/// 将一个内核调用点降级为对运行时的调用描述。
///
/// 依次执行：特性检查、确定平台、提取调优参数、编译内核模块、组装调用描述。
/// 任何一步失败都会中止整个调用点的降级。
pub fn lower_call<L, V>(
    lowering: &L,
    site: CallSite<'_, L::Program, V>,
) -> Result<Lowered<V>, LoweringError>
where
    L: ModuleLowering,
    L::Program: fmt::Debug,
{
    let CallSite {
        program,
        operands,
        avals_in,
        avals_out,
        in_shapes,
        out_shapes,
        interpret,
        debug,
        input_output_aliases,
        grid_mapping,
        name,
        compiler_params,
        platforms,
        module_platforms,
    } = site;

    if interpret {
        debug!("{name}: interpret mode, skip kernel lowering");
        return Ok(Lowered::Interpret(operands));
    }

    grid_mapping.check()?;
    let platform = Platform::resolve(platforms, module_platforms)?;
    let (tuning, backend_params) = compiler_params.into_tuning(platform)?;
    debug!(
        "{name}: lowering for {platform} with num_warps = {}, num_stages = {}",
        tuning.num_warps, tuning.num_stages
    );

    if debug {
        info!("{program:?}");
        info!("{grid_mapping:?}");
    }

    let shapes = in_shapes
        .iter()
        .chain(out_shapes)
        .cloned()
        .collect::<Vec<_>>();
    let LoweredModule { module, grid } =
        lowering.lower_module(program, &shapes, grid_mapping, name, platform)?;
    if debug {
        info!("{}", KernelModule::asm(&module));
    }

    Assembly {
        name,
        module: &module,
        grid: &grid,
        tuning,
        backend_params: &backend_params,
        debug,
        operands,
        out_shapes,
        operand_shapes: avals_in,
        result_shapes: avals_out,
        input_output_aliases,
    }
    .assemble()
    .map(Lowered::Custom)
}

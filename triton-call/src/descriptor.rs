use crate::{
    layout::{derive_layouts, Layout},
    lowering_failure, CompilerParams, GridSpec, KernelModule, LoweringError, ShapeDescriptor,
    TensorType, TuningParams,
};
use std::collections::BTreeMap;

/// 运行时入口名。
pub const CALL_TARGET_NAME: &str = "__gpu$xla.gpu.triton";
/// 调用约定版本，必须与运行时一致。
pub const API_VERSION: i32 = 4;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Attribute {
    Str(String),
    Bytes(Vec<u8>),
    I32(i32),
    Bool(bool),
}

impl Attribute {
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Self::I32(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }
}

/// 后端配置，按插入顺序保存的属性表。
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BackendConfig(Vec<(&'static str, Attribute)>);

impl BackendConfig {
    #[inline]
    fn push(&mut self, key: &'static str, value: Attribute) {
        debug_assert!(self.get(key).is_none(), "duplicate attribute {key}");
        self.0.push((key, value))
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 交给宿主运行时的调用描述。
#[derive(Clone, Debug)]
pub struct CallDescriptor<V> {
    result_types: Vec<TensorType>,
    operands: Vec<V>,
    backend_config: BackendConfig,
    operand_layouts: Vec<Layout>,
    result_layouts: Vec<Layout>,
    operand_output_aliases: BTreeMap<usize, usize>,
}

impl<V> CallDescriptor<V> {
    #[inline]
    pub fn call_target_name(&self) -> &'static str {
        CALL_TARGET_NAME
    }

    #[inline]
    pub fn api_version(&self) -> i32 {
        API_VERSION
    }

    #[inline]
    pub fn result_types(&self) -> &[TensorType] {
        &self.result_types
    }

    #[inline]
    pub fn operands(&self) -> &[V] {
        &self.operands
    }

    #[inline]
    pub fn backend_config(&self) -> &BackendConfig {
        &self.backend_config
    }

    #[inline]
    pub fn operand_layouts(&self) -> &[Layout] {
        &self.operand_layouts
    }

    #[inline]
    pub fn result_layouts(&self) -> &[Layout] {
        &self.result_layouts
    }

    #[inline]
    pub fn operand_output_aliases(&self) -> &BTreeMap<usize, usize> {
        &self.operand_output_aliases
    }

    #[inline]
    pub fn into_operands(self) -> Vec<V> {
        self.operands
    }
}

/// 组装调用描述所需的全部材料。
pub struct Assembly<'a, M, V> {
    pub name: &'a str,
    pub module: &'a M,
    /// 模块降级给出的网格。
    pub grid: &'a GridSpec,
    pub tuning: TuningParams,
    /// 提取调优参数后剩余的后端参数。
    pub backend_params: &'a CompilerParams,
    pub debug: bool,
    pub operands: Vec<V>,
    pub out_shapes: &'a [ShapeDescriptor],
    /// 调用点上实际的操作数数组。
    pub operand_shapes: &'a [ShapeDescriptor],
    /// 调用点上实际的结果数组。
    pub result_shapes: &'a [ShapeDescriptor],
    pub input_output_aliases: &'a [(usize, usize)],
}

impl<M: KernelModule, V> Assembly<'_, M, V> {
    pub fn assemble(self) -> Result<CallDescriptor<V>, LoweringError> {
        let Self {
            name,
            module,
            grid,
            tuning: TuningParams {
                num_warps,
                num_stages,
            },
            backend_params,
            debug,
            operands,
            out_shapes,
            operand_shapes,
            result_shapes,
            input_output_aliases,
        } = self;

        let [grid_x, grid_y, grid_z] = grid.normalize()?.to_i32()?;
        let result_types = out_shapes
            .iter()
            .map(TensorType::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let ir = serialize(module)?;

        let mut backend_config = BackendConfig::default();
        backend_config.push("name", Attribute::Str(name.into()));
        backend_config.push("ir", Attribute::Bytes(ir));
        backend_config.push("num_stages", Attribute::I32(num_stages));
        backend_config.push("num_warps", Attribute::I32(num_warps));
        backend_config.push("grid_x", Attribute::I32(grid_x));
        backend_config.push("grid_y", Attribute::I32(grid_y));
        backend_config.push("grid_z", Attribute::I32(grid_z));
        backend_config.push("debug", Attribute::Bool(debug));
        // 不稳定字段，将来可能移除
        if let Some(metadata) = backend_params.serialized_metadata()? {
            backend_config.push("serialized_metadata", Attribute::Str(metadata.into()));
        }

        Ok(CallDescriptor {
            result_types,
            operands,
            backend_config,
            operand_layouts: derive_layouts(operand_shapes),
            result_layouts: derive_layouts(result_shapes),
            operand_output_aliases: input_output_aliases.iter().copied().collect(),
        })
    }
}

fn serialize(module: &impl KernelModule) -> Result<Vec<u8>, LoweringError> {
    let mut buf = Vec::new();
    module
        .write_bytecode(&mut buf)
        .map_err(|e| lowering_failure(format!("failed to write module bytecode: {e}")))?;
    Ok(buf)
}
